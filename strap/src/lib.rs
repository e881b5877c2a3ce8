//! Dropdown widgets over a [`webdom`] document.
//!
//! A [`Dropdown`] binds to an element containing a `.dropdown-toggle` trigger
//! and a `.dropdown-menu` list. Dropdowns that share a [`DropdownGroup`] keep
//! at most one of their members open: opening one, or clicking anywhere
//! else in the document, closes the rest.

pub mod dropdown;
pub mod emitter;
pub mod error;
pub mod group;
pub mod lifecycle;
pub mod list;
pub mod parser;
pub mod prelude;

pub use dropdown::{Dropdown, DropdownId, DropdownOptions, DropdownSelectEvent};
pub use emitter::{Emitter, HandlerId};
pub use error::{Result, StrapError};
pub use group::DropdownGroup;
pub use lifecycle::Disposables;
pub use list::{List, ListCallbacks, ListOptions, ListSelectEvent};
pub use parser::parse;
