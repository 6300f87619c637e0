//! Command-line DNS client.
//!
//! Sends one query to the given server over UDP and prints the header flags
//! and all four sections of the response.
//!
//! # Usage
//!
//! ```bash
//! # A record, recursion desired
//! dns -r -s kazi.fit.vutbr.cz www.fit.vut.cz
//!
//! # AAAA record
//! dns -r -6 -s 8.8.8.8 www.fit.vut.cz
//!
//! # Reverse lookup of an IPv4 or IPv6 address
//! dns -r -x -s 8.8.8.8 147.229.9.26
//! ```
//!
//! # Examples
//!
//! ```bash
//! $ dns -r -s kazi.fit.vutbr.cz www.fit.vut.cz
//! Authoritative: No, Recursive: Yes, Truncated: No
//! Question Section(1)
//!  www.fit.vut.cz., A, IN
//! Answer Section(1)
//!  www.fit.vut.cz., A, IN, 14400, 147.229.9.23
//! Authority Section(0)
//! Additional Section(0)
//! ```
//!
//! Diagnostics go to stderr and are filtered by `RUST_LOG` or `--log-level`.
//! The exit status is 0 when a response was printed and 1 otherwise.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dns_query::cli::Args;
use dns_query::output::render_report;
use dns_query::resolver::{resolve, UdpTransport};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<String> {
    let config = args.into_config().context("invalid arguments")?;

    let mut transport = UdpTransport::connect(&config.server, config.port)
        .with_context(|| format!("cannot reach server {}:{}", config.server, config.port))?;
    let response = resolve(&config, &mut transport)
        .with_context(|| format!("query for {} failed", config.address))?;

    Ok(render_report(&response, config.recursion_desired))
}
