//! Command implementations for the listkeeper CLI.
//!
//! This is the command surface adapter: each function maps one subcommand
//! onto the storage engine or binding manager, performs the guild-scope
//! check the core deliberately leaves to callers, and returns plain data
//! for rendering. Nothing here constructs platform-specific messages.

use crate::binding::BindingManager;
use crate::models::{Binding, Task, TaskList};
use crate::storage::Storage;
use crate::{Error, Result};
use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Look up a list and enforce guild scoping when a guild id is supplied.
///
/// A list owned by another guild is reported as not found rather than as a
/// permission problem, so other guilds' list ids stay undiscoverable.
fn scoped_list(storage: &Storage, list_id: i64, guild_id: Option<i64>) -> Result<TaskList> {
    let list = storage.get_list(list_id)?;
    match guild_id {
        Some(g) if list.guild_id != g => {
            Err(Error::NotFound(format!("list not found: {}", list_id)))
        }
        _ => Ok(list),
    }
}

// === List commands ===

#[derive(Debug, Serialize)]
pub struct ListCreated {
    pub id: i64,
    pub guild_id: i64,
    pub name: String,
}

impl Output for ListCreated {
    fn to_human(&self) -> String {
        format!(
            "Created list {} \"{}\" for guild {}",
            self.id, self.name, self.guild_id
        )
    }
}

pub fn list_create(storage: &Storage, name: &str, guild_id: i64) -> Result<ListCreated> {
    let id = storage.create_list(name, guild_id)?;
    Ok(ListCreated {
        id,
        guild_id,
        name: name.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub list: TaskList,
    /// Tasks sorted by priority for display (storage keeps insertion order).
    pub tasks: Vec<Task>,
}

impl Output for ListView {
    fn to_human(&self) -> String {
        let mut out = format!("{} (list {})", self.list.name, self.list.id);
        if self.tasks.is_empty() {
            out.push_str("\n  (no tasks)");
        }
        for task in &self.tasks {
            out.push_str(&format!("\n  [{}] {} ({})", task.priority, task.name, task.id));
            if !task.description.is_empty() {
                out.push_str(&format!(" - {}", task.description));
            }
        }
        out
    }
}

pub fn list_show(storage: &Storage, list_id: i64, guild_id: Option<i64>) -> Result<ListView> {
    let list = scoped_list(storage, list_id, guild_id)?;
    let mut tasks = storage.get_tasks(list_id)?;
    tasks.sort_by_key(|t| (t.priority, t.id));
    Ok(ListView { list, tasks })
}

#[derive(Debug, Serialize)]
pub struct GuildLists {
    pub guild_id: i64,
    pub lists: Vec<TaskList>,
}

impl Output for GuildLists {
    fn to_human(&self) -> String {
        if self.lists.is_empty() {
            return format!("No lists for guild {}", self.guild_id);
        }
        let mut out = format!("Lists for guild {}:", self.guild_id);
        for list in &self.lists {
            out.push_str(&format!("\n  {} \"{}\"", list.id, list.name));
            if let Some(channel) = list.channel_id {
                out.push_str(&format!(" (bound to channel {})", channel));
            }
        }
        out
    }
}

pub fn list_ls(storage: &Storage, guild_id: i64) -> Result<GuildLists> {
    let lists = storage.lists_for_guild(guild_id)?;
    Ok(GuildLists { guild_id, lists })
}

#[derive(Debug, Serialize)]
pub struct ListDeleted {
    pub id: i64,
}

impl Output for ListDeleted {
    fn to_human(&self) -> String {
        format!("Deleted list {} and its tasks", self.id)
    }
}

pub fn list_delete(storage: &Storage, list_id: i64, guild_id: Option<i64>) -> Result<ListDeleted> {
    scoped_list(storage, list_id, guild_id)?;
    storage.delete_list(list_id)?;
    Ok(ListDeleted { id: list_id })
}

// === Task commands ===

#[derive(Debug, Serialize)]
pub struct TaskAdded {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub priority: i64,
}

impl Output for TaskAdded {
    fn to_human(&self) -> String {
        format!(
            "Added task {} \"{}\" (priority {}) to list {}",
            self.id, self.name, self.priority, self.list_id
        )
    }
}

pub fn task_add(
    storage: &Storage,
    list_id: i64,
    name: &str,
    priority: i64,
    description: &str,
    guild_id: Option<i64>,
) -> Result<TaskAdded> {
    scoped_list(storage, list_id, guild_id)?;
    let id = storage.create_task(list_id, name, priority, description)?;
    Ok(TaskAdded {
        id,
        list_id,
        name: name.to_string(),
        priority,
    })
}

#[derive(Debug, Serialize)]
pub struct TasksView {
    pub list_id: i64,
    pub tasks: Vec<Task>,
}

impl Output for TasksView {
    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return format!("No tasks in list {}", self.list_id);
        }
        let mut out = format!("Tasks in list {}:", self.list_id);
        for task in &self.tasks {
            out.push_str(&format!("\n  [{}] {} ({})", task.priority, task.name, task.id));
            if !task.description.is_empty() {
                out.push_str(&format!(" - {}", task.description));
            }
        }
        out
    }
}

/// List a list's tasks, sorted by priority for display.
///
/// An unknown list id yields an empty view, not an error; the storage
/// engine does not distinguish "no tasks" from "no such list".
pub fn task_ls(storage: &Storage, list_id: i64, guild_id: Option<i64>) -> Result<TasksView> {
    if let Some(g) = guild_id {
        match storage.get_list(list_id) {
            Ok(list) if list.guild_id == g => {}
            Ok(_) | Err(Error::NotFound(_)) => {
                return Ok(TasksView {
                    list_id,
                    tasks: Vec::new(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    let mut tasks = storage.get_tasks(list_id)?;
    tasks.sort_by_key(|t| (t.priority, t.id));
    Ok(TasksView { list_id, tasks })
}

#[derive(Debug, Serialize)]
pub struct TaskDeleted {
    pub id: i64,
}

impl Output for TaskDeleted {
    fn to_human(&self) -> String {
        format!("Deleted task {}", self.id)
    }
}

pub fn task_rm(storage: &Storage, task_id: i64) -> Result<TaskDeleted> {
    storage.delete_task(task_id)?;
    Ok(TaskDeleted { id: task_id })
}

// === Channel binding commands ===

#[derive(Debug, Serialize)]
pub struct BindingChanged {
    pub list_id: i64,
    pub binding: Binding,
}

impl Output for BindingChanged {
    fn to_human(&self) -> String {
        match &self.binding {
            Binding::Bound {
                channel_id,
                message_id: Some(m),
            } => format!(
                "List {} is bound to channel {} (message {})",
                self.list_id, channel_id, m
            ),
            Binding::Bound {
                channel_id,
                message_id: None,
            } => format!(
                "List {} is bound to channel {} (no rendered message yet)",
                self.list_id, channel_id
            ),
            Binding::Unbound => format!("List {} is not bound to a channel", self.list_id),
        }
    }
}

pub fn channel_bind(
    storage: &Storage,
    list_id: i64,
    channel_id: i64,
    guild_id: Option<i64>,
) -> Result<BindingChanged> {
    scoped_list(storage, list_id, guild_id)?;
    let manager = BindingManager::new(storage);
    manager.bind(list_id, channel_id)?;
    Ok(BindingChanged {
        list_id,
        binding: manager.current_binding(list_id)?,
    })
}

pub fn channel_unbind(
    storage: &Storage,
    list_id: i64,
    guild_id: Option<i64>,
) -> Result<BindingChanged> {
    scoped_list(storage, list_id, guild_id)?;
    let manager = BindingManager::new(storage);
    manager.unbind(list_id)?;
    Ok(BindingChanged {
        list_id,
        binding: Binding::Unbound,
    })
}

pub fn channel_show(
    storage: &Storage,
    list_id: i64,
    guild_id: Option<i64>,
) -> Result<BindingChanged> {
    scoped_list(storage, list_id, guild_id)?;
    let manager = BindingManager::new(storage);
    Ok(BindingChanged {
        list_id,
        binding: manager.current_binding(list_id)?,
    })
}

pub fn channel_record(
    storage: &Storage,
    list_id: i64,
    message_id: i64,
    guild_id: Option<i64>,
) -> Result<BindingChanged> {
    scoped_list(storage, list_id, guild_id)?;
    let manager = BindingManager::new(storage);
    manager.record_message(list_id, message_id)?;
    Ok(BindingChanged {
        list_id,
        binding: manager.current_binding(list_id)?,
    })
}
