//! Dropdown widget - a toggle trigger and a menu, one open per group.

pub mod events;
mod options;
mod state;

pub use options::DropdownOptions;
pub use state::{Dropdown, DropdownId, DropdownSelectEvent};

pub(crate) use state::DropdownInner;

/// Marks the element whose click or touch toggles the dropdown.
pub const TOGGLE_CLASS: &str = "dropdown-toggle";
/// Marks the menu element bound to a [`List`](crate::List).
pub const MENU_CLASS: &str = "dropdown-menu";
/// Applied to the root while the dropdown is open.
pub const OPEN_CLASS: &str = "open";
/// Class that disables the dropdown.
pub const DISABLED_CLASS: &str = "disabled";
/// Attribute that disables the dropdown (presence, any value).
pub const DISABLED_ATTR: &str = "disabled";
/// Attribute recording the id of the dropdown bound to an element.
pub const BOUND_ATTR: &str = "data-strap-id";
