//! Serialization of [`KeyInfo`] elements.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bon::Builder;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{KeyInfoError, Result};
use crate::key::PublicKey;
use crate::keyinfo::{KeyInfo, KeyInfoChild, X509Data};

/// The XML-Signature namespace.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Options controlling how a `KeyInfo` element is written.
///
/// # Fields
/// * `declaration` - Write the `<?xml ...?>` declaration first.
/// * `prefix` - Namespace prefix of every element. An empty prefix declares
///   the XML-Signature namespace as the default namespace.
/// * `indent` - Spaces per nesting level, 0 for compact output.
/// * `line_width` - Column at which base64 content is wrapped, 0 to disable.
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct XmlOptions {
    #[builder(default = true)]
    pub declaration: bool,
    #[builder(into, default = String::from("ds"))]
    pub prefix: String,
    #[builder(default = 2)]
    pub indent: usize,
    #[builder(default = 76)]
    pub line_width: usize,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Writes `key_info` as an XML document to `out`.
pub fn write_key_info<W: Write>(key_info: &KeyInfo, out: W, options: &XmlOptions) -> Result<()> {
    let writer = if options.indent > 0 {
        Writer::new_with_indent(out, b' ', options.indent)
    } else {
        Writer::new(out)
    };
    let mut sink = Sink {
        writer,
        prefix: options.prefix.as_str(),
        line_width: options.line_width,
    };

    if options.declaration {
        sink.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let root = sink.qualify("KeyInfo");
    let xmlns = if sink.prefix.is_empty() {
        "xmlns".to_string()
    } else {
        format!("xmlns:{}", sink.prefix)
    };
    sink.writer.write_event(Event::Start(
        BytesStart::new(root.as_str()).with_attributes([(xmlns.as_str(), XMLDSIG_NS)]),
    ))?;

    for child in key_info.children() {
        match child {
            KeyInfoChild::KeyValue(key) => sink.key_value(key)?,
            KeyInfoChild::X509Data(data) => sink.x509_data(data)?,
        }
    }

    sink.writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;
    sink.writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Serializes `key_info` into a string.
pub fn to_xml_string(key_info: &KeyInfo, options: &XmlOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_key_info(key_info, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| KeyInfoError::BuildError(e.to_string()))
}

struct Sink<'a, W: Write> {
    writer: Writer<W>,
    prefix: &'a str,
    line_width: usize,
}

impl<W: Write> Sink<'_, W> {
    fn qualify(&self, local: &str) -> String {
        if self.prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", self.prefix, local)
        }
    }

    fn start(&mut self, local: &str) -> Result<()> {
        let name = self.qualify(local);
        self.writer
            .write_event(Event::Start(BytesStart::new(name.as_str())))?;
        Ok(())
    }

    fn end(&mut self, local: &str) -> Result<()> {
        let name = self.qualify(local);
        self.writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }

    fn text_element(&mut self, local: &str, text: &str) -> Result<()> {
        self.start(local)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(local)
    }

    fn base64_element(&mut self, local: &str, bytes: &[u8]) -> Result<()> {
        let encoded = wrap(&STANDARD.encode(bytes), self.line_width);
        self.text_element(local, &encoded)
    }

    fn key_value(&mut self, key: &PublicKey) -> Result<()> {
        self.start("KeyValue")?;
        self.start(key.element_name())?;
        for (name, value) in key.components() {
            self.base64_element(name, value)?;
        }
        self.end(key.element_name())?;
        self.end("KeyValue")
    }

    fn x509_data(&mut self, data: &X509Data) -> Result<()> {
        self.start("X509Data")?;
        self.start("X509IssuerSerial")?;
        self.text_element("X509IssuerName", &data.issuer_serial.issuer_name)?;
        self.text_element("X509SerialNumber", &data.issuer_serial.serial_number)?;
        self.end("X509IssuerSerial")?;
        self.text_element("X509SubjectName", &data.subject_name)?;
        self.base64_element("X509Certificate", &data.certificate)?;
        self.end("X509Data")
    }
}

fn wrap(text: &str, width: usize) -> String {
    if width == 0 || text.len() <= width {
        return text.to_string();
    }
    let mut wrapped = String::with_capacity(text.len() + text.len() / width);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }
    wrapped
}
