//! Command-line interface for Flixdex.

mod commands;

use clap::{Args, Parser, Subcommand};

/// Flixdex - streaming title catalog
#[derive(Parser)]
#[command(name = "flixdex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create a default config file
    #[command(alias = "--init")]
    Init,

    /// List titles with the same filters the API accepts
    #[command(alias = "ls", alias = "l")]
    List(ListArgs),

    /// Show a single title
    #[command(alias = "info", alias = "i")]
    Show {
        /// Title ID
        id: String,
    },

    /// Print aggregate catalog statistics
    Summary,

    /// Soft-delete a title
    #[command(alias = "rm")]
    Delete {
        /// Title ID
        id: String,
    },

    /// Import titles from a JSON array file
    Import {
        /// Path to the JSON file
        path: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub page: Option<u64>,

    #[arg(long)]
    pub perpage: Option<u64>,

    /// Full-text search terms
    #[arg(long)]
    pub search: Option<String>,

    /// Genre filter, e.g. `anime` or `like:drama`
    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub cast_member: Option<String>,

    #[arg(long)]
    pub director: Option<String>,

    /// Release year filter, e.g. `2019` or `geq:2015`
    #[arg(long)]
    pub release_year: Option<String>,

    /// Comma-separated fields, `:desc` suffix for descending
    #[arg(long)]
    pub order_by: Option<String>,
}

pub use commands::*;
