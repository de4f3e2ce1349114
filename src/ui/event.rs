//! Events consumed by the UI loop

use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::catalog::Catalog;

/// Everything the event loop reacts to
///
/// The input thread and the refresh task are the producers; the UI loop is
/// the only consumer.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A key press
    Key(KeyEvent),
    /// The terminal was resized
    Resize,
    /// A fresh catalog replaced the current one
    CatalogRefreshed {
        catalog: Arc<Catalog>,
        skipped: usize,
    },
    /// The enumerator failed; the current catalog stays
    EnumerationFailed(String),
}
