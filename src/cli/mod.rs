//! CLI argument definitions for listkeeper.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Listkeeper - guild-scoped prioritized task lists with channel bindings.
#[derive(Parser, Debug)]
#[command(name = "lk")]
#[command(author, version, about = "Maintain named, prioritized task lists for chat communities", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Path to the database file. Defaults to the per-user data directory.
    /// Can also be set via the LK_DB environment variable.
    #[arg(long = "db", global = true, env = "LK_DB")]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task list management commands
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Task commands within a list
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Channel binding commands (where a list is displayed)
    Channel {
        #[command(subcommand)]
        command: ChannelCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a new list for a guild
    Create {
        /// List name
        name: String,

        /// Owning guild id
        #[arg(short, long)]
        guild: i64,
    },

    /// Show a list and its tasks, sorted by priority
    Show {
        /// List id
        list_id: i64,

        /// Restrict to this guild; lists of other guilds appear as not found
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// List every list a guild owns
    Ls {
        /// Guild id
        #[arg(short, long)]
        guild: i64,
    },

    /// Delete a list and all of its tasks
    Delete {
        /// List id
        list_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a list
    Add {
        /// List id
        list_id: i64,

        /// Task name
        name: String,

        /// Priority level; lower is more urgent
        #[arg(short, long, default_value_t = 0)]
        priority: i64,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// List a list's tasks, sorted by priority
    Ls {
        /// List id
        list_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// Remove a task
    Rm {
        /// Task id
        task_id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChannelCommands {
    /// Bind a list to a channel; clears any previously recorded message
    Bind {
        /// List id
        list_id: i64,

        /// Channel id
        channel_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// Clear a list's channel binding (idempotent)
    Unbind {
        /// List id
        list_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// Show a list's current binding state
    Show {
        /// List id
        list_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },

    /// Record the most recently rendered message for a bound list
    Record {
        /// List id
        list_id: i64,

        /// Message id
        message_id: i64,

        /// Restrict to this guild
        #[arg(short, long)]
        guild: Option<i64>,
    },
}
