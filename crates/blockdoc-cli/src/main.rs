//! BlockDoc CLI
//!
//! Command-line interface for block documents

use blockdoc_core::logging_facility::{self, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "blockdoc")]
#[command(about = "BlockDoc - hierarchical block documents with checksums", long_about = None)]
struct Cli {
    /// Logging profile (`RUST_LOG` overrides its filter); silent when omitted
    #[arg(long, value_enum, global = true)]
    log_profile: Option<LogProfile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Development,
    Production,
    Test,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
            LogProfile::Test => Profile::Test,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render an outline file as indented markup
    Render(commands::render::RenderArgs),
    /// Print block and document checksums of an outline file
    Checksums(commands::checksums::ChecksumsArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Some(profile) = cli.log_profile {
        logging_facility::init(profile.into());
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Checksums(args) => commands::checksums::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
