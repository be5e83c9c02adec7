//! Taxonomy CLI Binary Entry Point

use anyhow::Result;
use clap::Parser;
use taxonomy_cli::{default_fs, run, Cli};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let output = run(&cli, default_fs())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
