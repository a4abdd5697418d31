//! Listkeeper CLI - guild-scoped prioritized task lists with channel bindings.

use clap::Parser;
use listkeeper::cli::{ChannelCommands, Cli, Commands, ListCommands, TaskCommands};
use listkeeper::commands::{self, Output};
use listkeeper::storage::{self, Storage};
use std::path::PathBuf;
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run(cli) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            let err = serde_json::json!({ "error": e.to_string() });
            eprintln!("{}", err);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), listkeeper::Error> {
    let human = cli.human_readable;
    let db_path = resolve_db_path(cli.db_path)?;
    let storage = Storage::open(&db_path)?;

    match cli.command {
        Commands::List { command } => match command {
            ListCommands::Create { name, guild } => {
                output(&commands::list_create(&storage, &name, guild)?, human);
            }
            ListCommands::Show { list_id, guild } => {
                output(&commands::list_show(&storage, list_id, guild)?, human);
            }
            ListCommands::Ls { guild } => {
                output(&commands::list_ls(&storage, guild)?, human);
            }
            ListCommands::Delete { list_id, guild } => {
                output(&commands::list_delete(&storage, list_id, guild)?, human);
            }
        },

        Commands::Task { command } => match command {
            TaskCommands::Add {
                list_id,
                name,
                priority,
                description,
                guild,
            } => {
                output(
                    &commands::task_add(&storage, list_id, &name, priority, &description, guild)?,
                    human,
                );
            }
            TaskCommands::Ls { list_id, guild } => {
                output(&commands::task_ls(&storage, list_id, guild)?, human);
            }
            TaskCommands::Rm { task_id } => {
                output(&commands::task_rm(&storage, task_id)?, human);
            }
        },

        Commands::Channel { command } => match command {
            ChannelCommands::Bind {
                list_id,
                channel_id,
                guild,
            } => {
                output(
                    &commands::channel_bind(&storage, list_id, channel_id, guild)?,
                    human,
                );
            }
            ChannelCommands::Unbind { list_id, guild } => {
                output(&commands::channel_unbind(&storage, list_id, guild)?, human);
            }
            ChannelCommands::Show { list_id, guild } => {
                output(&commands::channel_show(&storage, list_id, guild)?, human);
            }
            ChannelCommands::Record {
                list_id,
                message_id,
                guild,
            } => {
                output(
                    &commands::channel_record(&storage, list_id, message_id, guild)?,
                    human,
                );
            }
        },
    }

    Ok(())
}

/// Resolve the database path: --db flag (or LK_DB env) beats the default
/// per-user data directory.
fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf, listkeeper::Error> {
    match explicit {
        Some(path) => Ok(path),
        None => storage::default_db_path(),
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
