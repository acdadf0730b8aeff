use der::asn1::Any;
use der::{Tag, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::Name;

/// Renders a distinguished name in the RFC 4514 string form.
///
/// RDNs are written most-specific first, separated by `,`. Multi-valued RDNs
/// join their attributes with `+`. The rendering is the one of `Name`'s
/// `Display`, which reads UTF8, Printable, IA5 and ASCII Teletex values as
/// text. BMP, Visible and Latin-1 Teletex values are transcoded to
/// UTF8String first so they print as text instead of `#hex`.
///
/// # Arguments
/// * `name` - The issuer or subject name of a certificate.
///
/// # Returns
/// The string used for `X509IssuerName` and `X509SubjectName`.
pub fn to_rfc4514(name: &Name) -> String {
    let needs_transcoding = name
        .0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .any(|atv| transcode(&atv.value).is_some());
    if !needs_transcoding {
        return name.to_string();
    }

    name.0
        .iter()
        .rev()
        .map(|rdn| {
            rdn.0
                .iter()
                .map(|atv| match transcode(&atv.value) {
                    Some(value) => AttributeTypeAndValue {
                        oid: atv.oid,
                        value,
                    }
                    .to_string(),
                    None => atv.to_string(),
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Re-encodes string values that `Display` would otherwise hex-dump.
fn transcode(value: &Any) -> Option<Any> {
    let bytes = value.value();
    let text: String = match value.tag() {
        Tag::VisibleString => std::str::from_utf8(bytes).ok()?.to_string(),
        // T.61 strings in the wild are almost always Latin-1.
        Tag::TeletexString if !bytes.is_ascii() => bytes.iter().map(|&b| b as char).collect(),
        Tag::BmpString => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            let units = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units).collect::<Result<String, _>>().ok()?
        }
        _ => return None,
    };
    Any::new(Tag::Utf8String, text.into_bytes()).ok()
}
