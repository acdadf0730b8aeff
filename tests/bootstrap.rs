//! Runs in its own test binary so the process-wide encoder registry starts
//! uninitialized.

mod util;

use ebxml_keyinfo::error::KeyInfoError;
use ebxml_keyinfo::keyinfo::{self, KeyInfoBuilder};

#[test]
fn empty_input_is_rejected_before_bootstrap() {
    assert!(!keyinfo::is_bootstrapped());

    assert!(matches!(
        keyinfo::build_key_info(&[]),
        Err(KeyInfoError::InvalidArgument(_))
    ));
    assert!(matches!(
        KeyInfoBuilder::new().build_key_info(&[]),
        Err(KeyInfoError::InvalidArgument(_))
    ));
    assert!(!keyinfo::is_bootstrapped(), "empty input must not initialize");

    let chain = util::load("self-signed.cer");
    KeyInfoBuilder::new().build_from_chain(&chain).unwrap();
    assert!(keyinfo::is_bootstrapped());
}
