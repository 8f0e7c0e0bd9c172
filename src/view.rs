//! Hooks into a host view that displays tables.
//!
//! The shell never draws anything itself besides transcript text. A host that
//! shows a table grid or a table list implements `ViewHooks` to learn when
//! those need reloading after a command changed the data.

use std::sync::Mutex;
use tracing::debug;

/// Notifications sent to the host view after data changes.
pub trait ViewHooks: Send + Sync {
    /// The contents of the given table may have changed.
    fn reload_current_table(&self, table: &str);

    /// Tables may have been created or dropped.
    fn refresh_table_list(&self);
}

/// A view that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl ViewHooks for NoopView {
    fn reload_current_table(&self, _table: &str) {}

    fn refresh_table_list(&self) {}
}

/// A view that only logs notifications. Used by the standalone binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingView;

impl ViewHooks for LoggingView {
    fn reload_current_table(&self, table: &str) {
        debug!(table, "View reload requested");
    }

    fn refresh_table_list(&self) {
        debug!("Table list refresh requested");
    }
}

/// A notification captured by `RecordingView`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Reload(String),
    RefreshTables,
}

/// A view that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded events.
    pub fn take(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, event: ViewEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl ViewHooks for RecordingView {
    fn reload_current_table(&self, table: &str) {
        self.push(ViewEvent::Reload(table.to_string()));
    }

    fn refresh_table_list(&self) {
        self.push(ViewEvent::RefreshTables);
    }
}
