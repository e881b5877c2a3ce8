//! List widget - highlight traversal and item selection for a menu.

pub mod events;
mod state;

pub use state::{List, ListCallbacks, ListOptions, ListSelectEvent};

/// Class marking the highlighted item.
pub const ACTIVE_CLASS: &str = "active";
/// Items with this class are separators and never highlighted.
pub const DIVIDER_CLASS: &str = "divider";
/// Items with this class are skipped by traversal and ignore clicks.
pub const DISABLED_CLASS: &str = "disabled";
