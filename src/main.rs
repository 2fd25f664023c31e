//! emlpush CLI: ingest .eml files into the content service; use --dry-run to parse only.

use anyhow::Result;
use clap::Parser;
use emlpush::engine::arg_parser::Cli;
use emlpush::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
