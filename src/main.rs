//! CLI entry point for the tile adjacency scorer

use clap::Parser;
use tileseam::io::cli::{Cli, FileProcessor};
use tileseam::io::logging::init_logging;

fn main() -> tileseam::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json_logs)?;
    let mut processor = FileProcessor::new(cli);
    processor.process()?;
    Ok(())
}
