//! List widget state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, warn};
use webdom::{Document, NodeId, Selector};

use super::{ACTIVE_CLASS, DISABLED_CLASS, DIVIDER_CLASS};
use crate::error::{Result, StrapError};
use crate::lifecycle::Disposables;

/// Construction options for a [`List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Whether items can be chosen.
    pub selectable: bool,
    /// Whether the default action of an item click is suppressed.
    pub prevent_default: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            selectable: true,
            prevent_default: false,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = prevent_default;
        self
    }
}

/// Payload reported when an item is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSelectEvent {
    /// The chosen `li` element.
    pub selected: NodeId,
}

type SelectCallback = Box<dyn Fn(ListSelectEvent) + Send + Sync>;
type EscapeCallback = Box<dyn Fn() + Send + Sync>;

/// Callbacks through which a list reports to its owner.
#[derive(Default)]
pub struct ListCallbacks {
    on_select: Option<SelectCallback>,
    on_escape: Option<EscapeCallback>,
}

impl ListCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: Fn(ListSelectEvent) + Send + Sync + 'static,
    {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn on_escape<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_escape = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ListCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCallbacks")
            .field("on_select", &self.on_select.is_some())
            .field("on_escape", &self.on_escape.is_some())
            .finish()
    }
}

pub(super) struct ListInner {
    pub(super) document: Document,
    pub(super) root: NodeId,
    selectable: AtomicBool,
    prevent_default: AtomicBool,
    highlighted: RwLock<Option<NodeId>>,
    callbacks: ListCallbacks,
    disposables: Mutex<Disposables>,
}

/// A menu of `li` items with one highlighted entry.
///
/// Down/Up move the highlight, Enter chooses the highlighted item, Escape
/// asks the owner to dismiss the list. Clicking an item chooses it. Choices
/// and escapes are reported through [`ListCallbacks`].
#[derive(Clone)]
pub struct List {
    pub(super) inner: Arc<ListInner>,
}

impl List {
    /// Bind a list to `root` and start listening for clicks and keys.
    pub fn new(
        document: &Document,
        root: NodeId,
        options: ListOptions,
        callbacks: ListCallbacks,
    ) -> Result<Self> {
        if !document.exists(root) {
            return Err(StrapError::Dom(webdom::DomError::UnknownNode(root)));
        }

        let list = Self {
            inner: Arc::new(ListInner {
                document: document.clone(),
                root,
                selectable: AtomicBool::new(options.selectable),
                prevent_default: AtomicBool::new(options.prevent_default),
                highlighted: RwLock::new(None),
                callbacks,
                disposables: Mutex::new(Disposables::new()),
            }),
        };

        let subscriptions = super::events::bind(&list)?;
        let mut disposables = list.disposables();
        for subscription in subscriptions {
            disposables.own(subscription);
        }
        drop(disposables);

        debug!("List bound to {:?} ({:?})", root, options);
        Ok(list)
    }

    /// The list's root element; receives focus when the owner opens.
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    fn disposables(&self) -> std::sync::MutexGuard<'_, Disposables> {
        self.inner
            .disposables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Options
    // -------------------------------------------------------------------------

    pub fn selectable(&self) -> bool {
        self.inner.selectable.load(Ordering::SeqCst)
    }

    pub fn set_selectable(&self, selectable: bool) {
        self.inner.selectable.store(selectable, Ordering::SeqCst);
    }

    pub fn prevent_default(&self) -> bool {
        self.inner.prevent_default.load(Ordering::SeqCst)
    }

    pub fn set_prevent_default(&self, prevent_default: bool) {
        self.inner.prevent_default.store(prevent_default, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Items and highlight
    // -------------------------------------------------------------------------

    /// Items that can be highlighted, in document order.
    pub fn items(&self) -> Vec<NodeId> {
        let doc = &self.inner.document;
        doc.query_selector_all(self.inner.root, &Selector::Tag("li".into()))
            .into_iter()
            .filter(|&item| self.is_item(item))
            .collect()
    }

    /// Whether `node` is an enabled, non-divider item of this list.
    pub fn is_item(&self, node: NodeId) -> bool {
        let doc = &self.inner.document;
        node != self.inner.root
            && doc.tag(node).as_deref() == Some("li")
            && doc.contains(self.inner.root, node)
            && !doc.has_class(node, DIVIDER_CLASS)
            && !doc.has_class(node, DISABLED_CLASS)
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        *self
            .inner
            .highlighted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Highlight `item`, moving the active class off the previous one.
    pub fn highlight(&self, item: NodeId) {
        let doc = &self.inner.document;
        let previous = self
            .inner
            .highlighted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(item);

        if let Some(previous) = previous.filter(|&p| p != item)
            && let Err(err) = doc.remove_class(previous, ACTIVE_CLASS)
        {
            warn!("Failed to clear highlight on {:?}: {}", previous, err);
        }
        if let Err(err) = doc.add_class(item, ACTIVE_CLASS) {
            warn!("Failed to highlight {:?}: {}", item, err);
        }
    }

    /// Highlight the first item. Returns it, or `None` for an empty list.
    pub fn select_first(&self) -> Option<NodeId> {
        let first = self.items().into_iter().next()?;
        self.highlight(first);
        Some(first)
    }

    pub fn select_last(&self) -> Option<NodeId> {
        let last = self.items().into_iter().last()?;
        self.highlight(last);
        Some(last)
    }

    /// Move the highlight down, wrapping to the first item.
    pub fn next(&self) -> Option<NodeId> {
        self.step(1)
    }

    /// Move the highlight up, wrapping to the last item.
    pub fn previous(&self) -> Option<NodeId> {
        self.step(-1)
    }

    fn step(&self, delta: isize) -> Option<NodeId> {
        let items = self.items();
        if items.is_empty() {
            return None;
        }
        let len = items.len() as isize;
        let index = match self.highlighted().and_then(|h| items.iter().position(|&i| i == h)) {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        let item = items[index as usize];
        self.highlight(item);
        Some(item)
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Choose `item`: highlight it and report it through `on_select`.
    /// Ignored unless the list is selectable and `item` is one of its items.
    pub fn choose(&self, item: NodeId) -> bool {
        if !self.selectable() || !self.is_item(item) {
            return false;
        }
        self.highlight(item);
        debug!("List {:?} chose {:?}", self.inner.root, item);
        if let Some(on_select) = &self.inner.callbacks.on_select {
            on_select(ListSelectEvent { selected: item });
        }
        true
    }

    /// Report an escape through `on_escape`.
    pub fn escape(&self) {
        debug!("List {:?} escaped", self.inner.root);
        if let Some(on_escape) = &self.inner.callbacks.on_escape {
            on_escape();
        }
    }

    /// Release the list's listeners. Safe to call more than once.
    pub fn destroy(&self) {
        self.disposables().dispose();
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("root", &self.inner.root)
            .field("selectable", &self.selectable())
            .field("prevent_default", &self.prevent_default())
            .field("highlighted", &self.highlighted())
            .finish()
    }
}
