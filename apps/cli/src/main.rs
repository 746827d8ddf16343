//! copyscan CLI — web plagiarism detection from the terminal.
//!
//! Checks documents against web sources sentence by sentence, compares
//! document pairs, and extracts SEO keywords.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
