//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    catalog::CatalogArgs,
    completions::CompletionsArgs,
    export::ExportArgs,
    new::NewArgs,
    quote::QuoteArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "dqt")]
#[command(author, version, about = "Dental Quotation Toolkit")]
#[command(
    long_about = "A Unix-style toolkit for pricing dental treatment plans kept as plain text YAML files: chart treatments tooth by tooth, get a grouped quotation, export it as a PDF."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new treatment plan file
    New(NewArgs),

    /// Price a plan and print the grouped quotation
    Quote(QuoteArgs),

    /// Check a plan against the treatment catalog
    Validate(ValidateArgs),

    /// List the treatment catalog
    Catalog(CatalogArgs),

    /// Export a plan's quotation as a PDF
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for quotation and catalog commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Automatically detect based on context (text for humans)
    #[default]
    Auto,
    /// Plain text summary
    Text,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
