//! Checksums command
//!
//! Usage: blockdoc checksums <FILE> [--verify]
//!
//! Prints one line per block in pre-order, indented by depth:
//! `<crc> <compound_crc> <first line of content>`, followed by
//! `document <checksum>`.

use blockdoc_core::render::INDENT;
use clap::Args;
use std::path::PathBuf;

use super::outline;

#[derive(Debug, Args)]
pub struct ChecksumsArgs {
    /// JSON outline to checksum
    pub file: PathBuf,

    /// Also recompute every checksum from scratch and check tree integrity
    #[arg(long)]
    pub verify: bool,
}

/// Execute checksums command
pub fn execute(args: ChecksumsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = outline::load(&args.file)?;

    if args.verify {
        doc.validate()?;
        doc.verify_checksums()?;
    }

    for (block, depth) in doc.iter_preorder() {
        let label = doc.display_string(block);
        println!(
            "{}{} {} {}",
            INDENT.repeat(depth - 1),
            block.crc(),
            block.compound_crc(),
            label.lines().next().unwrap_or_default()
        );
    }
    println!("document {}", doc.checksum());

    if args.verify {
        println!("✓ Checksums verified");
    }

    Ok(())
}
