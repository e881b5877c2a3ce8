//! Common imports for embedding dropdowns.

pub use crate::dropdown::{Dropdown, DropdownOptions, DropdownSelectEvent};
pub use crate::error::{Result, StrapError};
pub use crate::group::DropdownGroup;
pub use crate::parser::parse;
pub use webdom::{Document, Element, Event, EventType, Key, NodeId};
