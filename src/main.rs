//! keyinfo-writer - writes the `ds:KeyInfo` element of an ebXML CPP/CPA for a
//! certificate or certificate chain.

use std::error::Error as _;
use std::path::PathBuf;

use clap::Parser;
use ebxml_keyinfo::error::Result;
use ebxml_keyinfo::keyinfo::KeyInfoBuilder;
use ebxml_keyinfo::xml::XmlOptions;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keyinfo-writer")]
#[command(version)]
#[command(about = "Write the XML-Signature KeyInfo element for an ebXML CPP/CPA", long_about = None)]
struct Cli {
    /// Certificate file (DER, PEM or PKCS#7 p7b)
    #[arg(value_name = "CERTIFICATE")]
    certificate: PathBuf,

    /// Write the KeyInfo to this file instead of stdout
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Namespace prefix of the XML-Signature elements (empty for a default namespace)
    #[arg(long, default_value = "ds")]
    prefix: String,

    /// Spaces per indentation level
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Write everything on one line
    #[arg(long)]
    compact: bool,

    /// Omit the XML declaration
    #[arg(long)]
    no_declaration: bool,

    /// Column at which base64 content is wrapped (0 disables wrapping)
    #[arg(long, default_value = "76")]
    wrap: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn xml_options(&self) -> XmlOptions {
        XmlOptions::builder()
            .declaration(!self.no_declaration)
            .prefix(self.prefix.as_str())
            .indent(if self.compact { 0 } else { self.indent })
            .line_width(if self.compact { 0 } else { self.wrap })
            .build()
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.xml_options();
    debug!("Options: {:?}", options);

    KeyInfoBuilder::new().write_key_info(&cli.certificate, cli.output.as_deref(), &options)
}
