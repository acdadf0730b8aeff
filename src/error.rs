//! use ebxml_keyinfo::error::KeyInfoError;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Represents errors that can occur while loading certificates and building
/// `KeyInfo` elements.
///
/// Loading and building only ever produce the first four variants.
/// `WriteError` belongs to the serializer.
#[derive(Debug, Error)]
pub enum KeyInfoError {
    /// A caller supplied an empty path or an empty certificate sequence.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The certificate path could not be opened or read.
    #[error("Cannot read certificate file {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes are not DER, PEM or PKCS#7 certificate data, or hold no
    /// certificate at all.
    #[error("Failed to decode certificates: {0}")]
    DecodeError(String),

    /// Key or certificate material could not be encoded into the element.
    #[error("Failed to build KeyInfo: {0}")]
    BuildError(String),

    /// The serialized element could not be written out.
    #[error("Failed to write KeyInfo: {0}")]
    WriteError(#[from] io::Error),
}

impl From<der::Error> for KeyInfoError {
    /// Converts a `der::Error` into a `KeyInfoError`.
    fn from(err: der::Error) -> Self {
        KeyInfoError::DecodeError(err.to_string())
    }
}

impl From<pem::PemError> for KeyInfoError {
    fn from(err: pem::PemError) -> Self {
        KeyInfoError::DecodeError(err.to_string())
    }
}

impl From<quick_xml::Error> for KeyInfoError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => {
                KeyInfoError::WriteError(io::Error::new(io.kind(), io.to_string()))
            }
            other => KeyInfoError::BuildError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyInfoError>;
