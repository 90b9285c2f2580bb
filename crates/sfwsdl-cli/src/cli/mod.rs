//! CLI for refreshing the cached Salesforce WSDL.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sfwsdl_core::config;

use commands::run_refresh_wsdl;

const REFRESH_WSDL_HELP: &str = "\
Fetch the latest WSDL from the Salesforce instance of the current API session \
and store it at the configured path. The file is only replaced when the \
server answers HTTP 200 with well-formed XML.

Logging in to the API itself requires a WSDL, so the first one has to be \
downloaded manually from Salesforce.";

/// Top-level CLI for sfwsdl.
#[derive(Debug, Parser)]
#[command(name = "sfwsdl")]
#[command(about = "sfwsdl: keep a local Salesforce WSDL up to date", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Refresh the Salesforce WSDL.
    #[command(long_about = REFRESH_WSDL_HELP)]
    RefreshWsdl {
        /// Do not clear cache after refreshing WSDL.
        #[arg(short = 'c', long)]
        no_cache_clear: bool,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::RefreshWsdl { no_cache_clear } => run_refresh_wsdl(&cfg, no_cache_clear)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
