mod app;

use std::io::Read as _;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use confxml::xml::XmlOptions;
use confxml::ParseOptions;

use crate::app::{Cli, Format};

/// Line width used for `--format conf`.
const CONF_WIDTH: usize = 80;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Info+ on stderr, --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("confxml", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let source = read_input(cli)?;

    let options = ParseOptions {
        max_depth: cli.max_depth,
    };
    let document = confxml::from_str_with_options(&source, &options)?;
    log::debug!("parsed document: {document:?}");

    let output = match cli.format {
        Format::Xml => {
            let options = XmlOptions {
                root: cli.root.clone(),
                indent: (!cli.compact).then_some(cli.indent),
            };
            confxml::xml::to_string(&document, &options)?
        }
        Format::Conf if cli.compact => confxml::to_string(&document)?,
        Format::Conf => confxml::to_string_pretty(&document, CONF_WIDTH)?,
    };

    Ok(output)
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    match &cli.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            Ok(source)
        }
    }
}
