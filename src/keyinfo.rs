//! Builds the `ds:KeyInfo` element placed inside the `Certificate` element of
//! an ebXML CPP or CPA (version 2).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, error, info};

use crate::cert::Certificate;
use crate::chain::CertificateChain;
use crate::error::{KeyInfoError, Result};
use crate::key::{KeyValueRegistry, PublicKey};
use crate::xml::{self, XmlOptions};

static REGISTRY: OnceLock<KeyValueRegistry> = OnceLock::new();

/// Runs the process-wide one-time initialization of the key encoders.
///
/// Safe to call from any number of threads: the first caller builds the
/// registry, the others wait for it and then share it.
pub fn bootstrap() -> &'static KeyValueRegistry {
    REGISTRY.get_or_init(|| {
        let registry = KeyValueRegistry::with_builtin();
        debug!(
            "Initialized KeyValue encoders: {}",
            registry.algorithms().collect::<Vec<_>>().join(", ")
        );
        #[cfg(test)]
        tests::INIT_COUNT.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        registry
    })
}

/// Returns whether [`bootstrap`] has completed.
pub fn is_bootstrapped() -> bool {
    REGISTRY.get().is_some()
}

/// One child of a `KeyInfo` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInfoChild {
    KeyValue(PublicKey),
    X509Data(X509Data),
}

/// The `X509IssuerSerial` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509IssuerSerial {
    pub issuer_name: String,
    /// Decimal serial number.
    pub serial_number: String,
}

/// An `X509Data` element describing one certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509Data {
    pub issuer_serial: X509IssuerSerial,
    pub subject_name: String,
    /// Raw encoded certificate.
    pub certificate: Vec<u8>,
}

impl X509Data {
    pub fn from_certificate(cert: &Certificate) -> Self {
        Self {
            issuer_serial: X509IssuerSerial {
                issuer_name: cert.issuer_name(),
                serial_number: cert.serial_number(),
            },
            subject_name: cert.subject_name(),
            certificate: cert.as_der().to_vec(),
        }
    }
}

/// A built `ds:KeyInfo` element, ready to be serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInfo {
    children: Vec<KeyInfoChild>,
}

impl KeyInfo {
    /// Returns the children in document order.
    pub fn children(&self) -> &[KeyInfoChild] {
        &self.children
    }

    pub fn key_values(&self) -> impl Iterator<Item = &PublicKey> {
        self.children.iter().filter_map(|child| match child {
            KeyInfoChild::KeyValue(key) => Some(key),
            _ => None,
        })
    }

    pub fn x509_data(&self) -> impl Iterator<Item = &X509Data> {
        self.children.iter().filter_map(|child| match child {
            KeyInfoChild::X509Data(data) => Some(data),
            _ => None,
        })
    }

    pub fn contains_key_value(&self) -> bool {
        self.key_values().next().is_some()
    }

    pub fn contains_x509_data(&self) -> bool {
        self.x509_data().next().is_some()
    }

    pub(crate) fn from_children(children: Vec<KeyInfoChild>) -> Self {
        Self { children }
    }

    fn add(&mut self, child: KeyInfoChild) {
        self.children.push(child);
    }
}

/// Builds `KeyInfo` elements from certificate chains.
///
/// The key encoders are initialized on the first non-empty build, see
/// [`bootstrap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyInfoBuilder;

impl KeyInfoBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a `KeyInfo` for the given certificates.
    ///
    /// # Arguments
    /// * `certs` - The chain to describe. The first certificate must be the
    ///   end-entity certificate; only its public key is emitted as a
    ///   `KeyValue`. Every certificate gets an `X509Data`.
    ///
    /// # Returns
    /// `InvalidArgument` for an empty slice, checked before the bootstrap
    /// runs. `BuildError` if the end-entity key has no `KeyValue` encoding.
    pub fn build_key_info(&self, certs: &[Certificate]) -> Result<KeyInfo> {
        build_key_info(certs).inspect_err(|e| error!("Exception building KeyInfo: {}", e))
    }

    pub fn build_from_chain(&self, chain: &CertificateChain) -> Result<KeyInfo> {
        self.build_key_info(chain.certificates())
    }

    /// Loads the certificate (or chain) at `certificate_path`, builds its
    /// `KeyInfo` and writes the XML to `output_path`, or to stdout if `None`.
    pub fn write_key_info(
        &self,
        certificate_path: impl AsRef<Path>,
        output_path: Option<&Path>,
        options: &XmlOptions,
    ) -> Result<()> {
        let certificate_path = certificate_path.as_ref();
        info!("Loading certificate {}", certificate_path.display());
        let chain = CertificateChain::load(certificate_path).inspect_err(|e| {
            error!("Exception loading {}: {}", certificate_path.display(), e)
        })?;
        let key_info = self.build_from_chain(&chain)?;

        match output_path {
            Some(path) => {
                info!("Writing KeyInfo to {}", path.display());
                File::create(path)
                    .map_err(KeyInfoError::from)
                    .and_then(|file| write_flushed(&key_info, BufWriter::new(file), options))
                    .inspect_err(|e| error!("Exception writing {}: {}", path.display(), e))
            }
            None => {
                info!("Writing KeyInfo to stdout");
                write_flushed(&key_info, io::stdout().lock(), options)
                    .inspect_err(|e| error!("Exception writing KeyInfo: {}", e))
            }
        }
    }
}

fn write_flushed<W: Write>(key_info: &KeyInfo, mut out: W, options: &XmlOptions) -> Result<()> {
    xml::write_key_info(key_info, &mut out, options)?;
    out.flush()?;
    Ok(())
}

/// Builds a `KeyInfo` for the given certificates.
///
/// See [`KeyInfoBuilder::build_key_info`].
pub fn build_key_info(certs: &[Certificate]) -> Result<KeyInfo> {
    ensure_not_empty(certs)?;
    assemble(bootstrap(), certs)
}

fn ensure_not_empty(certs: &[Certificate]) -> Result<()> {
    if certs.is_empty() {
        return Err(KeyInfoError::InvalidArgument(
            "certificate list is empty".to_string(),
        ));
    }
    Ok(())
}

fn assemble(registry: &KeyValueRegistry, certs: &[Certificate]) -> Result<KeyInfo> {
    let mut key_info = KeyInfo::default();
    for (index, cert) in certs.iter().enumerate() {
        // Only the end-entity certificate contributes a KeyValue.
        if index == 0 {
            key_info.add(KeyInfoChild::KeyValue(
                registry.decode(cert.public_key_info())?,
            ));
        }
        key_info.add(KeyInfoChild::X509Data(X509Data::from_certificate(cert)));
    }

    debug!(
        "Built KeyInfo with {} X509Data element(s)",
        key_info.x509_data().count()
    );
    Ok(key_info)
}
