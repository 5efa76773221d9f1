//! SmartCheck CLI: checklist planning from estimate scope.
//!
//! Reads scope records, scoping answers and checklist templates as JSON,
//! then prints the derived context, the area/trade matrix, or a recommended
//! checklist plan.

mod commands;
mod render;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
