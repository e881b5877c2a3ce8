//! Declarative element builder.
//!
//! An [`Element`] describes a subtree before it exists in a document. Build
//! one with the chained setters and hand it to [`Document::mount`], which
//! creates the nodes and returns the handle of the subtree root.
//!
//! ```ignore
//! let dropdown = Element::span()
//!     .id("dd1")
//!     .class("dropdown")
//!     .child(Element::a().class("dropdown-toggle").text("Dropdown"))
//!     .child(
//!         Element::ul()
//!             .class("dropdown-menu")
//!             .child(Element::li().text("one"))
//!             .child(Element::li().text("two")),
//!     );
//! let root = doc.mount(doc.body(), dropdown)?;
//! ```
//!
//! [`Document::mount`]: crate::Document::mount

/// Description of an element and its children, not yet attached to a document.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn a() -> Self {
        Self::new("a")
    }

    pub fn ul() -> Self {
        Self::new("ul")
    }

    pub fn li() -> Self {
        Self::new("li")
    }

    pub fn form() -> Self {
        Self::new("form")
    }

    pub fn input() -> Self {
        Self::new("input")
    }

    pub fn button() -> Self {
        Self::new("button")
    }

    /// Set the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class. Whitespace-separated lists add every class.
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        for name in class.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}
