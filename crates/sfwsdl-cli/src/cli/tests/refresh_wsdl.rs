//! Tests for the refresh-wsdl subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_refresh_wsdl() {
    match parse(&["sfwsdl", "refresh-wsdl"]) {
        CliCommand::RefreshWsdl { no_cache_clear } => assert!(!no_cache_clear),
    }
}

#[test]
fn cli_parse_refresh_wsdl_no_cache_clear_long() {
    match parse(&["sfwsdl", "refresh-wsdl", "--no-cache-clear"]) {
        CliCommand::RefreshWsdl { no_cache_clear } => assert!(no_cache_clear),
    }
}

#[test]
fn cli_parse_refresh_wsdl_no_cache_clear_short() {
    match parse(&["sfwsdl", "refresh-wsdl", "-c"]) {
        CliCommand::RefreshWsdl { no_cache_clear } => assert!(no_cache_clear),
    }
}

#[test]
fn cli_rejects_positional_and_unknown_flags() {
    assert!(Cli::try_parse_from(["sfwsdl", "refresh-wsdl", "extra"]).is_err());
    assert!(Cli::try_parse_from(["sfwsdl", "refresh-wsdl", "--force"]).is_err());
    assert!(Cli::try_parse_from(["sfwsdl"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
