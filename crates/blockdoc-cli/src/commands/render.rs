//! Render command
//!
//! Usage: blockdoc render <FILE> [--output <FILE>]

use clap::Args;
use std::path::PathBuf;

use super::outline;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON outline to render
    pub file: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = outline::load(&args.file)?;
    let markup = doc.to_markup();

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, markup)?;
        println!("✓ Rendered to {}", output_path.display());
    } else {
        print!("{}", markup);
    }

    Ok(())
}
