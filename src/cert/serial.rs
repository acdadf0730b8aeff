use rsa::BigUint;

/// Renders a DER INTEGER body as a signed decimal string.
///
/// Serial numbers are arbitrary-precision and two's complement encoded. The
/// XML-Signature `X509SerialNumber` element carries the decimal value.
pub fn to_decimal(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "0".to_string();
    }

    let unsigned = BigUint::from_bytes_be(bytes);
    if bytes[0] & 0x80 == 0 {
        return unsigned.to_str_radix(10);
    }

    let modulus = BigUint::from(1u32) << (bytes.len() * 8);
    format!("-{}", (modulus - unsigned).to_str_radix(10))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_serials() {
        assert_eq!(to_decimal(&[0x01]), "1");
        assert_eq!(to_decimal(&[0x00, 0xc0, 0xff, 0xee]), "12648430");
        assert_eq!(to_decimal(&[0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]), "11111822610015");
    }

    #[test]
    fn wider_than_u128() {
        let bytes = [0x7f; 20];
        let expected = "727885129180488904360266563744972327436484050815";
        assert_eq!(to_decimal(&bytes), expected);
    }

    #[test]
    fn negative_serials() {
        assert_eq!(to_decimal(&[0xff]), "-1");
        assert_eq!(to_decimal(&[0x80]), "-128");
        assert_eq!(to_decimal(&[0xff, 0x00]), "-256");
    }
}
