pub mod name;
pub mod serial;

use std::fmt;

use der::Decode;
use x509_cert::certificate::CertificateInner;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{KeyInfoError, Result};

/// Represents a decoded X.509 certificate.
///
/// The encoded bytes are kept exactly as they were found in the input so
/// that `X509Certificate` reproduces them bit for bit.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
    der: Vec<u8>,
}

impl Certificate {
    /// Decodes a single DER-encoded certificate.
    ///
    /// # Arguments
    /// * `der` - The complete DER encoding, without trailing data.
    ///
    /// # Returns
    /// The decoded certificate, or `DecodeError` if the bytes are not one.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner: CertificateInner = CertificateInner::from_der(der)
            .map_err(|e| KeyInfoError::DecodeError(format!("not an X.509 certificate: {e}")))?;
        Ok(Self {
            inner,
            der: der.to_vec(),
        })
    }

    /// Returns the raw encoded certificate.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the issuer distinguished name in RFC 4514 form.
    pub fn issuer_name(&self) -> String {
        name::to_rfc4514(&self.inner.tbs_certificate.issuer)
    }

    /// Returns the subject distinguished name in RFC 4514 form.
    pub fn subject_name(&self) -> String {
        name::to_rfc4514(&self.inner.tbs_certificate.subject)
    }

    /// Returns the serial number as a signed decimal string.
    pub fn serial_number(&self) -> String {
        serial::to_decimal(self.inner.tbs_certificate.serial_number.as_bytes())
    }

    /// Returns the subject public key info.
    pub fn public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.tbs_certificate.subject_public_key_info
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subject=[{}] issuer=[{}] serial={}",
            self.subject_name(),
            self.issuer_name(),
            self.serial_number()
        )
    }
}
