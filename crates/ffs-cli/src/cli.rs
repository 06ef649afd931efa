//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// The Featrix Foundation Shell.
#[derive(Parser, Debug, Clone)]
#[command(name = "ffs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API server URL.
    #[arg(long, env = "FFS_SERVER", global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Compute cluster name.
    #[arg(long, env = "FFS_CLUSTER", global = true, value_name = "NAME")]
    pub cluster: Option<String>,

    /// Output raw JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Minimal output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage foundational models.
    Model {
        /// Model subcommand to execute.
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Server operations.
    Server {
        /// Server subcommand to execute.
        #[command(subcommand)]
        command: ServerCommands,
    },

    /// Manage stored API credentials.
    Auth {
        /// Auth subcommand to execute.
        #[command(subcommand)]
        command: AuthCommands,
    },
}

/// Model subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommands {
    /// Create a new foundational model from data.
    Create {
        /// Model name.
        #[arg(long)]
        name: String,

        /// CSV/Parquet/JSON training data file.
        #[arg(long = "data", value_name = "FILE")]
        data_file: PathBuf,

        /// Training epochs (auto if omitted).
        #[arg(long)]
        epochs: Option<u32>,

        /// Comma-separated columns to ignore.
        #[arg(long, value_delimiter = ',', value_name = "COLS")]
        ignore_columns: Vec<String>,
    },

    /// List models.
    List {
        /// Filter by name prefix.
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Show model details.
    Show {
        /// Model ID to inspect.
        model_id: String,
    },

    /// Show columns in the model's embedding space.
    Columns {
        /// Model ID to inspect.
        model_id: String,
    },

    /// Show the model card.
    Card {
        /// Model ID to inspect.
        model_id: String,
    },

    /// Wait for model training to complete.
    Wait {
        /// Model ID to monitor.
        model_id: String,

        /// Seconds between checks.
        #[arg(long, default_value_t = 10)]
        poll_interval: u64,

        /// Max wait time in seconds.
        #[arg(long, default_value_t = 3600)]
        timeout: u64,
    },

    /// Extend a model with new data.
    Extend {
        /// Model ID to extend.
        model_id: String,

        /// New data file.
        #[arg(long = "data", value_name = "FILE")]
        data_file: PathBuf,

        /// Additional epochs.
        #[arg(long)]
        epochs: Option<u32>,
    },

    /// Encode a record into the embedding space.
    Encode {
        /// Model ID to encode with.
        model_id: String,

        /// JSON object for one record.
        record_json: String,

        /// Return 3D short embedding for visualization.
        #[arg(long)]
        short: bool,
    },

    /// Publish a model.
    Publish {
        /// Model ID to publish.
        model_id: String,

        /// Organization ID.
        #[arg(long)]
        org: String,

        /// Published name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Unpublish a model.
    Unpublish {
        /// Model ID to unpublish.
        model_id: String,
    },

    /// Deprecate a model with a warning and expiration date.
    Deprecate {
        /// Model ID to deprecate.
        model_id: String,

        /// Deprecation warning message.
        #[arg(long)]
        message: String,

        /// Expiration date (ISO format).
        #[arg(long)]
        expires: String,
    },

    /// Delete a model.
    Delete {
        /// Model ID to delete.
        model_id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Server subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ServerCommands {
    /// Check API server health.
    Health,
}

/// Auth subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommands {
    /// Store an API key for later use.
    ///
    /// The key lands in `$HOME/.featrix.key` by default; with `--project`
    /// it is written to `./.featrix.key` so it only applies to the current
    /// project tree. A `--server` flag given alongside is pinned as the
    /// stored base URL.
    Login {
        /// API key to store.
        #[arg(long)]
        api_key: String,

        /// Write to ./.featrix.key instead of the home directory.
        #[arg(long)]
        project: bool,
    },

    /// Show which credentials would be used.
    Show,

    /// Remove credentials stored in the home directory.
    Logout,
}
