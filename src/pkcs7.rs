//! Minimal PKCS#7 / CMS definitions for pulling certificates out of a
//! degenerate `SignedData` (a p7b bundle).
//!
//! Only the fields needed to reach the certificate set are typed, the rest
//! are kept as `AnyRef`. The certificate set is read in encounter order
//! rather than through `SetOfVec`, which would re-sort the elements.
//!
//! Bundles are decoded as DER first. Bundles written with indefinite lengths
//! are then retried in BER mode.

use bcder::{Mode, Oid, Tag};
use const_oid::db::rfc5911::ID_SIGNED_DATA;
use der::asn1::{AnyRef, ObjectIdentifier};
use der::{Decode, Reader, Sequence};
use tracing::debug;

use crate::cert::Certificate;
use crate::error::{KeyInfoError, Result};

/// `id-signedData` for the BER decoder.
const SIGNED_DATA: Oid<&[u8]> = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);

/// The `ContentInfo` type is defined in [RFC 5652 Section 3].
///
/// ```text
///   ContentInfo ::= SEQUENCE {
///       contentType        CONTENT-TYPE.
///                       &id({ContentSet}),
///       content            [0] EXPLICIT CONTENT-TYPE.
///                       &Type({ContentSet}{@contentType})}
/// ```
///
/// [RFC 5652 Section 3]: https://www.rfc-editor.org/rfc/rfc5652#section-3
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct ContentInfo<'a> {
    pub content_type: ObjectIdentifier,
    #[asn1(context_specific = "0", tag_mode = "EXPLICIT")]
    pub content: AnyRef<'a>,
}

/// The `SignedData` type is defined in [RFC 5652 Section 5.1].
///
/// ```text
///   SignedData ::= SEQUENCE {
///       version CMSVersion,
///       digestAlgorithms SET OF DigestAlgorithmIdentifier,
///       encapContentInfo EncapsulatedContentInfo,
///       certificates [0] IMPLICIT CertificateSet OPTIONAL,
///       crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///       signerInfos SignerInfos }
/// ```
///
/// [RFC 5652 Section 5.1]: https://www.rfc-editor.org/rfc/rfc5652#section-5.1
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct SignedData<'a> {
    pub version: u8,
    pub digest_algorithms: AnyRef<'a>,
    pub encap_content_info: AnyRef<'a>,
    #[asn1(
        context_specific = "0",
        tag_mode = "IMPLICIT",
        constructed = "true",
        optional = "true"
    )]
    pub certificates: Option<CertificateSet<'a>>,
    #[asn1(
        context_specific = "1",
        tag_mode = "IMPLICIT",
        constructed = "true",
        optional = "true"
    )]
    pub crls: Option<RevocationInfoChoices<'a>>,
    pub signer_infos: AnyRef<'a>,
}

/// Encodings of the X.509 entries of a `CertificateSet`, in file order.
///
/// Other `CertificateChoices` (extended and attribute certificates) are
/// tagged `[0]`..`[3]` and skipped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CertificateSet<'a>(pub Vec<&'a [u8]>);

impl<'a> der::DecodeValue<'a> for CertificateSet<'a> {
    fn decode_value<R: Reader<'a>>(decoder: &mut R, header: der::Header) -> der::Result<Self> {
        decoder.read_nested(header.length, |decoder| {
            let mut res = Vec::new();

            while !decoder.is_finished() {
                let tlv = decoder.tlv_bytes()?;
                if tlv.first() == Some(&0x30) {
                    res.push(tlv);
                }
            }

            Ok(Self(res))
        })
    }
}

impl der::EncodeValue for CertificateSet<'_> {
    fn value_len(&self) -> der::Result<der::Length> {
        self.0.iter().try_fold(der::Length::ZERO, |len, tlv| {
            len + der::Length::try_from(tlv.len())?
        })
    }

    fn encode_value(&self, writer: &mut impl der::Writer) -> der::Result<()> {
        for tlv in &self.0 {
            writer.write(tlv)?;
        }

        Ok(())
    }
}

impl der::FixedTag for CertificateSet<'_> {
    const TAG: der::Tag = der::Tag::Set;
}

/// The `RevocationInfoChoices` of a `SignedData`, kept undecoded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RevocationInfoChoices<'a>(pub &'a [u8]);

impl<'a> der::DecodeValue<'a> for RevocationInfoChoices<'a> {
    fn decode_value<R: Reader<'a>>(decoder: &mut R, header: der::Header) -> der::Result<Self> {
        Ok(Self(decoder.read_slice(header.length)?))
    }
}

impl der::EncodeValue for RevocationInfoChoices<'_> {
    fn value_len(&self) -> der::Result<der::Length> {
        der::Length::try_from(self.0.len())
    }

    fn encode_value(&self, writer: &mut impl der::Writer) -> der::Result<()> {
        writer.write(self.0)
    }
}

impl der::FixedTag for RevocationInfoChoices<'_> {
    const TAG: der::Tag = der::Tag::Set;
}

/// Returns whether `data` looks like a `ContentInfo` rather than a bare
/// certificate: a SEQUENCE whose first element is an OID. Both definite and
/// indefinite outer lengths are recognized.
pub fn is_content_info(data: &[u8]) -> bool {
    if data.starts_with(&[0x30, 0x80, 0x06]) {
        return true;
    }
    let mut reader = match der::SliceReader::new(data) {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    match der::Header::decode(&mut reader) {
        Ok(header) if header.tag == der::Tag::Sequence => {}
        _ => return false,
    }
    matches!(reader.peek_byte(), Some(0x06))
}

/// Decodes every X.509 certificate of a PKCS#7 `SignedData`, DER or BER.
///
/// # Returns
/// The certificates in the order they appear in the bundle. The list is empty
/// if the bundle carries no certificates; the caller decides whether that is
/// an error.
pub fn decode_certificates(data: &[u8]) -> Result<Vec<Certificate>> {
    decode_der_certificates(data).or_else(|der_err| {
        debug!("Not a DER PKCS#7 bundle ({}), retrying as BER", der_err);
        decode_ber_certificates(data).map_err(|ber_err| {
            if data.get(1) == Some(&0x80) {
                ber_err
            } else {
                der_err
            }
        })
    })
}

fn decode_der_certificates(der: &[u8]) -> Result<Vec<Certificate>> {
    let content_info = ContentInfo::from_der(der)?;
    if content_info.content_type != ID_SIGNED_DATA {
        return Err(KeyInfoError::DecodeError(format!(
            "PKCS#7 content type {} is not signedData",
            content_info.content_type
        )));
    }

    let signed_data: SignedData<'_> = content_info.content.decode_as()?;
    signed_data
        .certificates
        .unwrap_or_default()
        .0
        .into_iter()
        .map(Certificate::from_der)
        .collect()
}

fn decode_ber_certificates(ber: &[u8]) -> Result<Vec<Certificate>> {
    let certificates = Mode::Ber
        .decode(ber, |cons| {
            cons.take_sequence(|cons| { // ContentInfo
                SIGNED_DATA.skip_if(cons)?; // contentType
                cons.take_constructed_if(Tag::CTX_0, |cons| { // content
                    cons.take_sequence(|cons| { // SignedData
                        cons.skip_one()?; // version
                        cons.skip_one()?; // digestAlgorithms
                        cons.skip_one()?; // encapContentInfo
                        let certificates = cons.take_opt_constructed_if(
                            Tag::CTX_0,
                            |cons| cons.capture_all(),
                        )?;
                        cons.skip_all()?; // crls, signerInfos
                        Ok(certificates)
                    })
                })
            })
        })
        .map_err(|e| KeyInfoError::DecodeError(format!("malformed BER PKCS#7: {e}")))?;

    match certificates {
        Some(set) => split_certificate_set(set.as_slice()),
        None => Ok(Vec::new()),
    }
}

/// Splits the content of a `CertificateSet` into its X.509 entries.
fn split_certificate_set(content: &[u8]) -> Result<Vec<Certificate>> {
    let mut reader = der::SliceReader::new(content)?;
    let mut certificates = Vec::new();
    // Stop at end-of-contents octets left by an indefinite-length set.
    while !reader.is_finished() && reader.peek_byte() != Some(0x00) {
        let tlv = reader.tlv_bytes()?;
        if tlv.first() == Some(&0x30) {
            certificates.push(Certificate::from_der(tlv)?);
        }
    }
    Ok(certificates)
}
