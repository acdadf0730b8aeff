use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::cert::Certificate;
use crate::error::{KeyInfoError, Result};
use crate::pem_utils;
use crate::pkcs7;

/// An ordered, non-empty list of certificates decoded from one file.
///
/// Index 0 is taken to be the end-entity certificate and the remaining
/// entries its issuers, in the order the file lists them. This order is
/// never checked against the issuer and subject names: a file listing the
/// chain the other way round silently yields a `KeyInfo` describing the
/// wrong key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certificates: Vec<Certificate>,
}

impl CertificateChain {
    /// Loads the certificates of a DER, PEM or PKCS#7 (p7b) file.
    ///
    /// # Arguments
    /// * `path` - Path to the certificate file. Must not be empty.
    ///
    /// # Returns
    /// The chain in file order, `InvalidArgument` for an empty path,
    /// `FileNotFound` if the file cannot be read and `DecodeError` if it holds
    /// no certificate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(KeyInfoError::InvalidArgument(
                "certificate path expected".to_string(),
            ));
        }

        debug!("Loading certificate from: {}", path.display());
        let data = fs::read(path).map_err(|source| KeyInfoError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(&data)
    }

    /// Decodes every certificate in `data`, detecting the format.
    ///
    /// Accepts a single DER certificate, a DER `ContentInfo` carrying PKCS#7
    /// `SignedData`, or PEM armor of either (several blocks allowed).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let certificates = if pem_utils::is_pem(data) {
            decode_pem(data)?
        } else {
            decode_der(data)?
        };

        if certificates.is_empty() {
            return Err(KeyInfoError::DecodeError(
                "no certificates found".to_string(),
            ));
        }

        for cert in &certificates {
            debug!("Certificate: {}", cert);
        }
        info!("Loaded {} certificate(s)", certificates.len());

        Ok(Self { certificates })
    }

    /// Returns the certificates as an immutable view.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Returns an independently owned copy of the certificates.
    pub fn to_vec(&self) -> Vec<Certificate> {
        self.certificates.clone()
    }

    /// Consumes the chain and returns its certificates.
    pub fn into_certificates(self) -> Vec<Certificate> {
        self.certificates
    }

    /// Returns the certificate at index 0.
    pub fn end_entity(&self) -> &Certificate {
        &self.certificates[0]
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Always false: an empty chain cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }
}

impl<'a> IntoIterator for &'a CertificateChain {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn decode_der(data: &[u8]) -> Result<Vec<Certificate>> {
    if pkcs7::is_content_info(data) {
        return pkcs7::decode_certificates(data);
    }
    Ok(vec![Certificate::from_der(data)?])
}

fn decode_pem(data: &[u8]) -> Result<Vec<Certificate>> {
    let mut certificates = Vec::new();
    for (label, der) in pem_utils::pem_blocks_to_der(data)? {
        if pem_utils::CERTIFICATE_LABELS.contains(&label.as_str()) {
            certificates.push(Certificate::from_der(&der)?);
        } else if pem_utils::PKCS7_LABELS.contains(&label.as_str()) {
            certificates.extend(pkcs7::decode_certificates(&der)?);
        } else {
            debug!("Skipping PEM block labelled {}", label);
        }
    }
    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_der_certificate() {
        let chain = CertificateChain::from_bytes(include_bytes!("../tests/data/self-signed.cer"))
            .unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain.end_entity().as_der(),
            include_bytes!("../tests/data/self-signed.cer")
        );
    }

    #[test]
    fn pkcs7_keeps_bundle_order() {
        let chain =
            CertificateChain::from_bytes(include_bytes!("../tests/data/chain.p7b")).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.certificates()[0].subject_name(),
            "CN=partner.example.com,OU=ebXML,O=Example\\, Inc.,C=US"
        );
        assert_eq!(
            chain.certificates()[1].subject_name(),
            "CN=Example Intermediate CA,O=Example Issuing Authority,C=US"
        );
    }

    #[test]
    fn pem_matches_der() {
        let pem = CertificateChain::from_bytes(include_bytes!("../tests/data/self-signed.pem"))
            .unwrap();
        let der = CertificateChain::from_bytes(include_bytes!("../tests/data/self-signed.cer"))
            .unwrap();
        assert_eq!(pem, der);
    }

    #[test]
    fn pem_armored_pkcs7() {
        let chain =
            CertificateChain::from_bytes(include_bytes!("../tests/data/chain-pem.p7b")).unwrap();
        let der = CertificateChain::from_bytes(include_bytes!("../tests/data/chain.p7b")).unwrap();
        assert_eq!(chain, der);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            CertificateChain::from_bytes(b"This is not a certificate."),
            Err(KeyInfoError::DecodeError(_))
        ));
        assert!(matches!(
            CertificateChain::from_bytes(&[]),
            Err(KeyInfoError::DecodeError(_))
        ));
    }

    #[test]
    fn pem_without_certificates_is_a_decode_error() {
        let key_only = "-----BEGIN PUBLIC KEY-----\nAQI=\n-----END PUBLIC KEY-----\n";
        assert!(matches!(
            CertificateChain::from_bytes(key_only.as_bytes()),
            Err(KeyInfoError::DecodeError(msg)) if msg == "no certificates found"
        ));
    }

    #[test]
    fn copies_are_independent() {
        let chain =
            CertificateChain::from_bytes(include_bytes!("../tests/data/chain.p7b")).unwrap();
        let mut copy = chain.to_vec();
        copy.reverse();
        copy.pop();
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.end_entity().serial_number(),
            "12648430"
        );
    }
}
