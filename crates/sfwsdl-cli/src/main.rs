use sfwsdl_core::logging::{self, LogTarget};

mod cli;

use crate::cli::CliCommand;

fn main() {
    if let LogTarget::File(path) = logging::init() {
        tracing::debug!("writing log to {}", path.display());
    }

    if let Err(err) = CliCommand::run_from_args() {
        tracing::error!("{:#}", err);
        eprintln!("sfwsdl error: {:#}", err);
        std::process::exit(1);
    }
}
