//! CLI command handlers.

mod refresh_wsdl;

pub use refresh_wsdl::run_refresh_wsdl;
