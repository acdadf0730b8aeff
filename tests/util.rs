#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ebxml_keyinfo::chain::CertificateChain;

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn data_path(name: &str) -> PathBuf {
    data_dir().join(name)
}

pub fn load(name: &str) -> CertificateChain {
    CertificateChain::load(data_path(name)).unwrap()
}

/// A scratch path under the target directory, unique per test.
pub fn scratch_path(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("keyinfo-tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}
