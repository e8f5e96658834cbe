use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kindred")]
#[command(about = "Catalogue legacy media by content-fingerprint similarity", long_about = None)]
pub struct Cli {
    /// Working directory holding the stage artifacts (overrides Config.toml)
    #[arg(long, global = true, value_name = "DIR")]
    pub working_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Copy the original media into the protected working area
    Stage {
        /// Directory holding the original media
        #[arg(value_name = "DIR")]
        source: PathBuf,
    },
    /// Convert staged documents to ODT via LibreOffice
    Convert,
    /// Fingerprint extracted files and write the relation table
    Hash {
        /// What to do with files that fail UTF-8 decoding
        #[arg(long, value_enum, default_value = "ask")]
        binary: BinaryFallback,
    },
    /// Build the presence matrix from the relation table
    Binary,
    /// Compute the similarity matrix from the presence matrix
    Similarity,
    /// Run the hash, binary and similarity stages in sequence
    Process {
        /// What to do with files that fail UTF-8 decoding
        #[arg(long, value_enum, default_value = "skip")]
        binary: BinaryFallback,
    },
    /// Print configuration values
    PrintConfig,
}

/// Fallback policy for files that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BinaryFallback {
    /// Ask per file
    Ask,
    /// Fingerprint raw bytes without asking
    Hash,
    /// Leave the file out without asking
    Skip,
}
