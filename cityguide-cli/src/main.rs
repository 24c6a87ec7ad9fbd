//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    if let Err(err) = init_logging() {
        eprintln!("cityguide: logging disabled: {err}");
    }
    if let Err(err) = cityguide_cli::run() {
        eprintln!("cityguide: {err}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only JSON output.
fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
