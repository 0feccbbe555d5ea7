pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

/// Audit trails for document stores: what changed, who changed it.
#[derive(Parser, Debug)]
#[command(name = "doctrail", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to an alternative config directory (default: .doctrail)
    #[arg(long, global = true, env = "DOCTRAIL_DIR")]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize doctrail in the current project
    Init,

    /// Show what changed between two JSON documents
    Diff {
        /// Document before the change
        before: String,
        /// Document after the change
        after: String,
    },

    /// Build and store an audit record for a document change
    Record {
        /// Document before the change ("-" if it did not exist)
        before: String,
        /// Document after the change
        after: String,
        /// Who performed the change
        #[arg(long, env = "DOCTRAIL_ACTOR")]
        actor: Option<String>,
        /// Operation label stored with the record
        #[arg(long, default_value = "save")]
        action: String,
        /// Logical type of the document (e.g. the collection name)
        #[arg(long)]
        model: Option<String>,
    },

    /// Show stored audit records
    Log {
        /// Filter by actor
        #[arg(long)]
        actor: Option<String>,
        /// Filter records since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,
        /// Show last N records
        #[arg(long)]
        last: Option<usize>,
    },
}
