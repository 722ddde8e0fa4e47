use std::io;

use chirp_config::{RunMode, USAGE};
use chirp_engine::{run_concurrent, run_sequential, ResponseWriter};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr; stdout carries nothing but response lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mode = match RunMode::from_args(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(_) => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    let stdin = io::stdin();
    let writer = ResponseWriter::new(io::stdout());

    match mode {
        RunMode::Sequential => run_sequential(stdin.lock(), &writer)?,
        RunMode::Concurrent { workers, block } => {
            info!(workers, block, "starting feed server");
            run_concurrent(stdin.lock(), &writer, workers, block)?;
        }
    }

    Ok(())
}
