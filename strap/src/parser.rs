//! Declarative instantiation from markup.
//!
//! Any element carrying the `dropdown` class, or `data-strap-type="dropdown"`,
//! becomes a [`Dropdown`]. Options come from a JSON object in the
//! `data-strap-props` attribute:
//!
//! ```text
//! <span class="dropdown" data-strap-props='{"selectFirstOnOpen": true}'>
//!     <a class="dropdown-toggle">Dropdown</a>
//!     <ul class="dropdown-menu"> ... </ul>
//! </span>
//! ```
//!
//! Elements already bound to a dropdown are skipped, so parsing the same
//! subtree twice does not double-bind.

use log::debug;
use webdom::{Document, NodeId};

use crate::dropdown::{BOUND_ATTR, Dropdown, DropdownOptions};
use crate::error::{Result, StrapError};
use crate::group::DropdownGroup;

/// Class that marks an element for declarative instantiation.
pub const DROPDOWN_CLASS: &str = "dropdown";
/// Attribute naming the widget type to instantiate.
pub const TYPE_ATTR: &str = "data-strap-type";
/// Attribute holding JSON construction options.
pub const PROPS_ATTR: &str = "data-strap-props";

/// Instantiate a dropdown for every marked element under `root` (inclusive),
/// in document order, all joining `group`.
///
/// Stops at the first element with malformed options; dropdowns created
/// before it are dropped, which unbinds them again.
pub fn parse(document: &Document, root: NodeId, group: &DropdownGroup) -> Result<Vec<Dropdown>> {
    let mut candidates = vec![root];
    candidates.extend(document.descendants(root));
    candidates.retain(|&node| is_candidate(document, node));

    let mut dropdowns = Vec::with_capacity(candidates.len());
    for node in candidates {
        let options = options_for(document, node)?;
        dropdowns.push(Dropdown::new(document, node, group, options)?);
    }

    debug!("Parsed {} dropdowns under {:?}", dropdowns.len(), root);
    Ok(dropdowns)
}

fn is_candidate(document: &Document, node: NodeId) -> bool {
    if document.has_attr(node, BOUND_ATTR) {
        return false;
    }
    match document.attr(node, TYPE_ATTR) {
        Some(kind) => kind == "dropdown",
        None => document.has_class(node, DROPDOWN_CLASS),
    }
}

/// Read the options for `node` from its `data-strap-props` attribute.
pub fn options_for(document: &Document, node: NodeId) -> Result<DropdownOptions> {
    match document.attr(node, PROPS_ATTR) {
        Some(json) => DropdownOptions::from_json(&json)
            .map_err(|source| StrapError::InvalidOptions { node, source }),
        None => Ok(DropdownOptions::default()),
    }
}
