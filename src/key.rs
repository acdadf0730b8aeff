use const_oid::ObjectIdentifier;
use const_oid::db::rfc5912::{ID_DSA, RSA_ENCRYPTION};
use der::asn1::UintRef;
use der::{Decode, Sequence};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{KeyInfoError, Result};

/// Public key material in one of the XML-Signature `KeyValue` forms.
///
/// Every component is a `ds:CryptoBinary`: the big-endian magnitude with
/// leading zero octets stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// `RSAKeyValue`
    Rsa { modulus: Vec<u8>, exponent: Vec<u8> },
    /// `DSAKeyValue`
    Dsa {
        p: Vec<u8>,
        q: Vec<u8>,
        g: Vec<u8>,
        y: Vec<u8>,
    },
}

/// `Dss-Parms` from RFC 3279 section 2.3.2.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DssParms<'a> {
    p: UintRef<'a>,
    q: UintRef<'a>,
    g: UintRef<'a>,
}

impl PublicKey {
    /// Extracts the RSA modulus and public exponent of an `rsaEncryption`
    /// subject public key.
    pub fn from_rsa_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let key = rsa::pkcs1::RsaPublicKey::from_der(subject_key_bytes(spki)?)
            .map_err(|e| KeyInfoError::BuildError(format!("malformed RSA public key: {e}")))?;
        Ok(PublicKey::Rsa {
            modulus: crypto_binary(key.modulus.as_bytes()),
            exponent: crypto_binary(key.public_exponent.as_bytes()),
        })
    }

    /// Extracts the domain parameters and public value of an `id-dsa`
    /// subject public key.
    pub fn from_dsa_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let params = spki.algorithm.parameters.as_ref().ok_or_else(|| {
            KeyInfoError::BuildError("DSA public key without domain parameters".to_string())
        })?;
        let parms: DssParms<'_> = params
            .decode_as()
            .map_err(|e| KeyInfoError::BuildError(format!("malformed DSA parameters: {e}")))?;
        let y = UintRef::from_der(subject_key_bytes(spki)?)
            .map_err(|e| KeyInfoError::BuildError(format!("malformed DSA public key: {e}")))?;
        Ok(PublicKey::Dsa {
            p: crypto_binary(parms.p.as_bytes()),
            q: crypto_binary(parms.q.as_bytes()),
            g: crypto_binary(parms.g.as_bytes()),
            y: crypto_binary(y.as_bytes()),
        })
    }

    /// Name of the `KeyValue` child element.
    pub fn element_name(&self) -> &'static str {
        match self {
            PublicKey::Rsa { .. } => "RSAKeyValue",
            PublicKey::Dsa { .. } => "DSAKeyValue",
        }
    }

    /// Child elements of the `KeyValue` form in schema order.
    pub fn components(&self) -> Vec<(&'static str, &[u8])> {
        match self {
            PublicKey::Rsa { modulus, exponent } => {
                vec![("Modulus", modulus.as_slice()), ("Exponent", exponent.as_slice())]
            }
            PublicKey::Dsa { p, q, g, y } => vec![
                ("P", p.as_slice()),
                ("Q", q.as_slice()),
                ("G", g.as_slice()),
                ("Y", y.as_slice()),
            ],
        }
    }
}

fn subject_key_bytes(spki: &SubjectPublicKeyInfoOwned) -> Result<&[u8]> {
    spki.subject_public_key.as_bytes().ok_or_else(|| {
        KeyInfoError::BuildError("subject public key has unused bits".to_string())
    })
}

fn crypto_binary(bytes: &[u8]) -> Vec<u8> {
    match bytes.iter().position(|&b| b != 0) {
        Some(start) => bytes[start..].to_vec(),
        None => vec![0],
    }
}

/// Decodes the `KeyValue` form of one public key algorithm.
pub type KeyValueDecoder = fn(&SubjectPublicKeyInfoOwned) -> Result<PublicKey>;

/// The public key algorithms that have a `KeyValue` encoding.
#[derive(Debug)]
pub struct KeyValueRegistry {
    decoders: Vec<(ObjectIdentifier, &'static str, KeyValueDecoder)>,
}

impl KeyValueRegistry {
    /// Registry holding the RSA and DSA encoders.
    pub fn with_builtin() -> Self {
        Self {
            decoders: vec![
                (
                    RSA_ENCRYPTION,
                    "rsaEncryption",
                    PublicKey::from_rsa_spki as KeyValueDecoder,
                ),
                (ID_DSA, "id-dsa", PublicKey::from_dsa_spki as KeyValueDecoder),
            ],
        }
    }

    /// Returns whether keys of the given algorithm can be encoded.
    pub fn supports(&self, algorithm: &ObjectIdentifier) -> bool {
        self.decoders.iter().any(|(oid, ..)| oid == algorithm)
    }

    /// Names of the registered algorithms.
    pub fn algorithms(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.iter().map(|(_, name, _)| *name)
    }

    /// Encodes a subject public key into its `KeyValue` form.
    ///
    /// # Returns
    /// `BuildError` if the algorithm is not registered or the key material is
    /// malformed.
    pub fn decode(&self, spki: &SubjectPublicKeyInfoOwned) -> Result<PublicKey> {
        let algorithm = &spki.algorithm.oid;
        let (_, _, decoder) = self
            .decoders
            .iter()
            .find(|(oid, ..)| oid == algorithm)
            .ok_or_else(|| {
                KeyInfoError::BuildError(format!(
                    "no KeyValue encoding for public key algorithm {algorithm}"
                ))
            })?;
        decoder(spki)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::Certificate;

    fn spki_of(der: &[u8]) -> SubjectPublicKeyInfoOwned {
        Certificate::from_der(der).unwrap().public_key_info().clone()
    }

    #[test]
    fn rsa_key_value() {
        let spki = spki_of(include_bytes!("../tests/data/self-signed.cer"));
        let key = KeyValueRegistry::with_builtin().decode(&spki).unwrap();
        let PublicKey::Rsa { modulus, exponent } = &key else {
            panic!("expected an RSA key, got {key:?}");
        };
        assert_eq!(exponent, &vec![0x01, 0x00, 0x01]);
        assert_eq!(modulus.len(), 256);
        assert_ne!(modulus[0], 0);
        assert_eq!(key.element_name(), "RSAKeyValue");
    }

    #[test]
    fn dsa_key_value() {
        let spki = spki_of(include_bytes!("../tests/data/dsa-self-signed.cer"));
        let key = KeyValueRegistry::with_builtin().decode(&spki).unwrap();
        assert_eq!(key.element_name(), "DSAKeyValue");
        let names: Vec<_> = key.components().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["P", "Q", "G", "Y"]);
        let PublicKey::Dsa { p, q, .. } = key else {
            unreachable!()
        };
        assert_eq!(p.len(), 256);
        assert_eq!(q.len(), 32);
    }

    #[test]
    fn ec_keys_have_no_key_value() {
        let spki = spki_of(include_bytes!("../tests/data/ec-self-signed.cer"));
        let registry = KeyValueRegistry::with_builtin();
        assert!(!registry.supports(&spki.algorithm.oid));
        assert!(matches!(
            registry.decode(&spki),
            Err(KeyInfoError::BuildError(_))
        ));
    }

    #[test]
    fn crypto_binary_strips_leading_zeros() {
        assert_eq!(crypto_binary(&[0, 0, 1, 0]), vec![1, 0]);
        assert_eq!(crypto_binary(&[0, 0]), vec![0]);
    }
}
