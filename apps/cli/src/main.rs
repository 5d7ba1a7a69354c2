//! unidoc CLI — assemble Markdown manuals from YAML-declared components.
//!
//! Concatenates each manual's component fragments into one document and
//! mirrors it into the docs tree for the static site generator.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
