use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// confxml - convert configuration files to XML
#[derive(Debug, Parser)]
#[command(name = "confxml", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to read. Reads standard input when omitted.
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Xml)]
    pub format: Format,

    /// Name of the root XML element.
    #[arg(long, default_value = "config")]
    pub root: String,

    /// Spaces per indentation level of the XML output.
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Write the output on a single line.
    #[arg(long)]
    pub compact: bool,

    /// Maximum nesting depth accepted by the parser.
    #[arg(long, default_value_t = 128)]
    pub max_depth: usize,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// XML document.
    Xml,
    /// The configuration with constants and expressions resolved.
    Conf,
}
