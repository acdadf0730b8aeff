/// Labels whose contents are a single DER certificate.
pub const CERTIFICATE_LABELS: &[&str] = &["CERTIFICATE", "X509 CERTIFICATE", "TRUSTED CERTIFICATE"];

/// Labels whose contents are a DER `ContentInfo`.
pub const PKCS7_LABELS: &[&str] = &["PKCS7", "CMS"];

/// Returns whether the bytes carry PEM armor rather than raw DER.
pub fn is_pem(data: &[u8]) -> bool {
    std::str::from_utf8(data)
        .map(|text| text.contains("-----BEGIN "))
        .unwrap_or(false)
}

/// Convert every PEM block of the input into its label and DER‑encoded bytes,
/// in file order.
pub fn pem_blocks_to_der(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>, pem::PemError> {
    let blocks = pem::parse_many(data)?;
    Ok(blocks
        .into_iter()
        .map(|block| (block.tag().to_string(), block.into_contents()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pem_armor() {
        assert!(is_pem(b"-----BEGIN CERTIFICATE-----\nMAA=\n-----END CERTIFICATE-----\n"));
        assert!(!is_pem(&[0x30, 0x82, 0x01, 0x00]));
        assert!(!is_pem(b"plain text"));
    }

    #[test]
    fn keeps_block_order() {
        let text = "-----BEGIN CERTIFICATE-----\nAQI=\n-----END CERTIFICATE-----\n\
                    -----BEGIN PKCS7-----\nAwQ=\n-----END PKCS7-----\n";
        let blocks = pem_blocks_to_der(text.as_bytes()).unwrap();
        assert_eq!(
            blocks,
            vec![
                ("CERTIFICATE".to_string(), vec![1, 2]),
                ("PKCS7".to_string(), vec![3, 4]),
            ]
        );
    }
}
