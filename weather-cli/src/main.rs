//! Binary crate for the `weather-reporter` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Detecting whether a person is at the keyboard
//! - Logging setup and exit codes

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::from(cli::usage_exit_code(&err)));
        }
    };
    logging::init_tracing(cmd.verbose)?;
    let code = cmd.run().await?;
    Ok(ExitCode::from(code))
}
