//! # ebxml-keyinfo - XML-Signature KeyInfo elements for ebXML CPP/CPA
//!
//! An ebXML Collaboration-Protocol Profile or Agreement (version 2) carries
//! each party's certificates as `ds:KeyInfo` elements. This crate loads a
//! certificate or certificate chain from disk and builds that element.
//!
//! ## Supported Certificate Formats
//!
//! - **DER**: a single binary X.509 certificate (`.cer`, `.der`)
//! - **PKCS#7**: a `SignedData` bundle holding one or more certificates (`.p7b`)
//! - **PEM**: the base64 armor of either, several blocks allowed
//!
//! The format is detected from the file contents.
//!
//! ## Output
//!
//! The `KeyInfo` holds one `KeyValue` with the public key of the first
//! (end-entity) certificate, followed by one `X509Data` per certificate in
//! file order with its issuer and serial number, subject name and encoding.
//! RSA and DSA keys are supported.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ebxml_keyinfo::{
//!     chain::CertificateChain,
//!     keyinfo::KeyInfoBuilder,
//!     xml::{self, XmlOptions},
//! };
//!
//! # fn main() -> Result<(), ebxml_keyinfo::error::KeyInfoError> {
//! let chain = CertificateChain::load("partner.p7b")?;
//! let key_info = KeyInfoBuilder::new().build_from_chain(&chain)?;
//!
//! let xml = xml::to_xml_string(&key_info, &XmlOptions::default())?;
//! println!("{}", xml);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns a [`error::KeyInfoError`]:
//!
//! ```rust
//! use ebxml_keyinfo::{chain::CertificateChain, error::KeyInfoError};
//!
//! match CertificateChain::load("") {
//!     Ok(chain) => println!("Loaded {} certificates", chain.len()),
//!     Err(KeyInfoError::InvalidArgument(msg)) => println!("Invalid argument: {}", msg),
//!     Err(KeyInfoError::FileNotFound { path, .. }) => println!("Missing {}", path.display()),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Known Limitation
//!
//! The order of a chain is taken from the file and never checked against the
//! issuer and subject names. Certificate trust, expiry and revocation are not
//! checked either.
//!
//! ## Module Organization
//!
//! - [`chain`]: Loading certificate files into ordered chains
//! - [`cert`]: The decoded certificate and its name and serial rendering
//! - [`key`]: Public key material in `KeyValue` form
//! - [`keyinfo`]: Building `KeyInfo` elements
//! - [`xml`]: Writing `KeyInfo` elements as XML
//! - [`pkcs7`]: Minimal PKCS#7 `SignedData` decoding
//! - [`error`]: Error types

pub mod cert;
pub mod chain;
pub mod error;
pub mod key;
pub mod keyinfo;
pub mod pem_utils;
pub mod pkcs7;
pub mod xml;
