//! Simple selectors: `tag`, `.class` or `#id`.

use std::fmt;
use std::str::FromStr;

use crate::error::{DomError, Result};
use crate::node::NodeData;

/// A single simple selector.
///
/// Compound and combinator selectors are not supported; delegation in this
/// crate only ever needs to match one element by tag, class or id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Tag(String),
    Class(String),
    Id(String),
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let valid = |name: &str| !name.is_empty() && name.chars().all(is_name_char);

        let selector = if let Some(class) = trimmed.strip_prefix('.') {
            valid(class).then(|| Selector::Class(class.to_string()))
        } else if let Some(id) = trimmed.strip_prefix('#') {
            valid(id).then(|| Selector::Id(id.to_string()))
        } else {
            valid(trimmed).then(|| Selector::Tag(trimmed.to_ascii_lowercase()))
        };

        selector.ok_or_else(|| DomError::InvalidSelector(input.to_string()))
    }

    pub(crate) fn matches(&self, node: &NodeData) -> bool {
        match self {
            Selector::Tag(tag) => node.tag == *tag,
            Selector::Class(class) => node.has_class(class),
            Selector::Id(id) => node.attrs.get("id").is_some_and(|v| v == id),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => write!(f, "{tag}"),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Id(id) => write!(f, "#{id}"),
        }
    }
}
