use std::process::ExitCode;

use bandwidth_insights::cli::{self, Args};
use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();

    match cli::run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
