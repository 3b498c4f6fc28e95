//! Command-line interface for mapdiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapdiff")]
#[command(about = "A coverage diff tool for crowd-sourced map data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override workspace location
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a mapdiff workspace
    Init,

    /// List relations with their coverage
    List {
        /// Filter tokens, e.g. "incomplete" or "region/01/subregion/011"
        #[arg(long)]
        filter: Option<String>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Fetch fresh map data from Overpass
    Update {
        /// Relation to update; every configured relation when omitted
        relation: Option<String>,

        /// Update the cached street tables
        #[arg(long)]
        streets: bool,

        /// Update the cached house-number tables
        #[arg(long)]
        housenumbers: bool,
    },

    /// Rebuild cached reference tables from the configured sources
    UpdateRef {
        /// Relation to update; every configured relation when omitted
        relation: Option<String>,

        /// Update the cached reference street tables
        #[arg(long)]
        streets: bool,

        /// Update the cached reference house-number tables
        #[arg(long)]
        housenumbers: bool,
    },

    /// Report streets present in the reference but missing from the map
    MissingStreets {
        /// Relation to report on
        relation: String,

        /// Output format: "pretty", "text", "html", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Report house numbers present in the reference but missing from the map
    MissingHousenumbers {
        /// Relation to report on
        relation: String,

        /// Output format: "pretty", "text", "html", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Show a cached table or the query that refreshes it
    View {
        /// Relation to inspect
        relation: String,

        /// Artifact: "streets", "housenumbers", "ref-streets",
        /// "ref-housenumbers", "streets-query", "housenumbers-query"
        artifact: String,

        /// Output format: "raw", "html"
        #[arg(long, default_value = "raw")]
        format: String,
    },

    /// Show cached artifact statistics
    Stats {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty', 'text', 'html', or 'json'",
                s
            )),
        }
    }
}

/// The cached artifacts and query texts `view` can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    MapStreets,
    MapHousenumbers,
    RefStreets,
    RefHousenumbers,
    StreetsQuery,
    HousenumbersQuery,
}

impl ViewKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "streets" => Ok(Self::MapStreets),
            "housenumbers" => Ok(Self::MapHousenumbers),
            "ref-streets" => Ok(Self::RefStreets),
            "ref-housenumbers" => Ok(Self::RefHousenumbers),
            "streets-query" => Ok(Self::StreetsQuery),
            "housenumbers-query" => Ok(Self::HousenumbersQuery),
            _ => Err(format!(
                "Invalid artifact: {}. Use 'streets', 'housenumbers', 'ref-streets', \
                 'ref-housenumbers', 'streets-query', or 'housenumbers-query'",
                s
            )),
        }
    }
}
