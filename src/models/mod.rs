//! Data models for listkeeper entities.
//!
//! - `TaskList` - a named, guild-scoped collection of prioritized tasks
//! - `Task` - a single prioritized item belonging to one list
//! - `Binding` - a list's association with a channel and rendered message

use serde::{Deserialize, Serialize};

/// A named task list owned by one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    /// Generated row id; unique and immutable once assigned.
    pub id: i64,

    /// The guild (server) that owns the list. Scopes discoverability.
    pub guild_id: i64,

    /// List name as shown to users.
    pub name: String,

    /// Channel the list is currently displayed in, if bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,

    /// Most recently rendered message for the list, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
}

/// One prioritized item in a task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Generated row id.
    pub id: i64,

    /// The list this task belongs to. Always references an existing list.
    pub list_id: i64,

    /// Priority level; lower is more urgent. Display order is the
    /// caller's concern, storage keeps insertion order.
    pub priority: i64,

    /// Task name.
    pub name: String,

    /// Free-form description.
    pub description: String,
}

/// The binding sub-state of a list.
///
/// `Unbound` is a normal value, not an error: a list that has never been
/// bound (or whose id is unknown) reports `Unbound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Binding {
    Unbound,
    Bound {
        channel_id: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<i64>,
    },
}

impl Binding {
    /// Whether the list is currently bound to a channel.
    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound { .. })
    }
}
