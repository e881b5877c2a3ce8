//! Dropdown construction options.

use serde::Deserialize;

use crate::list::ListOptions;

/// Construction options for a [`Dropdown`](super::Dropdown).
///
/// Deserializes from camelCase JSON with every field optional, which is the
/// format of the `data-strap-props` attribute:
///
/// ```ignore
/// let options = DropdownOptions::from_json(r#"{"selectFirstOnOpen": true}"#)?;
/// assert!(options.selectable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownOptions {
    /// Whether menu items can be chosen.
    pub selectable: bool,
    /// Suppress the default action when a menu item is clicked.
    pub prevent_default: bool,
    /// Highlight the first menu item whenever the dropdown opens.
    pub select_first_on_open: bool,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            selectable: true,
            prevent_default: false,
            select_first_on_open: false,
        }
    }
}

impl DropdownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = prevent_default;
        self
    }

    pub fn select_first_on_open(mut self, select_first_on_open: bool) -> Self {
        self.select_first_on_open = select_first_on_open;
        self
    }

    /// The subset forwarded to the menu list.
    pub fn list_options(&self) -> ListOptions {
        ListOptions::new()
            .selectable(self.selectable)
            .prevent_default(self.prevent_default)
    }
}
