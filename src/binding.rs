//! Channel binding management.
//!
//! A list is optionally displayed as one rendered message in one channel.
//! The binding manager owns that sub-state on top of the storage engine's
//! column-level primitives, including the rebind policy: binding a list to
//! a new channel always clears the stored message id, because a message
//! rendered in the old channel cannot be edited in the new one.

use crate::models::Binding;
use crate::storage::Storage;
use crate::{Error, Result};

/// Coordinates the `Unbound` / `Bound` state of lists.
pub struct BindingManager<'a> {
    storage: &'a Storage,
}

impl<'a> BindingManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Bind a list to a channel.
    ///
    /// Overwrites any previous binding and clears the stored message id;
    /// the next render in the new channel records a fresh one.
    pub fn bind(&self, list_id: i64, channel_id: i64) -> Result<()> {
        self.storage.set_channel(list_id, channel_id)?;
        self.storage.set_message(list_id, None)
    }

    /// Record the most recently rendered message for a bound list.
    ///
    /// Fails with `InvalidInput` when the list is unbound: a message id
    /// without a channel is meaningless.
    pub fn record_message(&self, list_id: i64, message_id: i64) -> Result<()> {
        match self.current_binding(list_id)? {
            Binding::Bound { .. } => self.storage.set_message(list_id, Some(message_id)),
            Binding::Unbound => {
                // get_channel cannot tell "unknown list" from "unbound";
                // resolve which error to report.
                self.storage.get_list(list_id)?;
                Err(Error::InvalidInput(format!(
                    "list {} is not bound to a channel",
                    list_id
                )))
            }
        }
    }

    /// Clear the binding unconditionally. Idempotent from any prior state.
    pub fn unbind(&self, list_id: i64) -> Result<()> {
        self.storage.forget_channel(list_id)
    }

    /// The current binding state of a list.
    ///
    /// `Unbound` is a normal value covering both "never bound" and
    /// "unknown list"; callers that need a real not-found error check the
    /// list first.
    pub fn current_binding(&self, list_id: i64) -> Result<Binding> {
        match self.storage.get_channel(list_id)? {
            (Some(channel_id), message_id) => Ok(Binding::Bound {
                channel_id,
                message_id,
            }),
            (None, _) => Ok(Binding::Unbound),
        }
    }
}
