//! wfctl - command-line client for a hosted genomics workflow service.
//!
//! This crate validates submission options, issues storage access tokens,
//! talks to the workflow service with retries, and maps workflow status to
//! the process exit code.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod request;
pub mod service;
pub mod storage;
pub mod utils;
pub mod validate;
pub mod workflow;

use clap::Parser;
use cli::Cli;
use constants::{APP_NAME, VERSION, exit};
use service::{ReqwestTransport, ServiceClient};
use storage::{AccountKeySigner, RetryingIssuer};
use tracing::{info, warn};
use workflow::WorkflowExecutor;

pub use error::{Error, Result};

/// Main entry point for the wfctl CLI; returns the process exit code.
pub fn run() -> Result<i32> {
    let line = Cli::parse().into_command_line();

    init_logging(line.verbose, line.quiet);

    if let Err(e) = ctrlc::set_handler(|| {
        std::process::exit(exit::INTERRUPTED);
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    info!("{APP_NAME} {VERSION}");

    let file_options = config::load_invocation_options(line.config_file.as_deref())?;
    let options = line.options.or_fill(file_options);

    let prepared = request::build_invocation(line.action, &options)?;
    for warning in &prepared.warnings {
        warn!("{warning}");
    }

    let invocation = prepared.invocation;
    let transport = ReqwestTransport::new()?;
    let client = ServiceClient::new(transport, &invocation.settings);
    let issuer = RetryingIssuer::new(AccountKeySigner::new());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    WorkflowExecutor::new(&client, &issuer, &mut out).execute(&invocation.command)
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
