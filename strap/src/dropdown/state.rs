//! Dropdown widget state.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::{debug, warn};
use webdom::{Document, Event, NodeId};

use super::{BOUND_ATTR, DISABLED_ATTR, DISABLED_CLASS, OPEN_CLASS, TOGGLE_CLASS};
use crate::dropdown::DropdownOptions;
use crate::emitter::{Emitter, HandlerId};
use crate::error::{Result, StrapError};
use crate::group::{DropdownGroup, Membership};
use crate::lifecycle::Disposables;
use crate::list::List;

/// Unique identifier for a Dropdown widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DropdownId(usize);

impl DropdownId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for DropdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__dropdown_{}", self.0)
    }
}

/// Payload of the dropdown's `select` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownSelectEvent {
    /// The chosen menu item.
    pub selected_item: NodeId,
}

pub(crate) struct DropdownInner {
    pub(crate) id: DropdownId,
    pub(super) document: Document,
    pub(super) root: NodeId,
    pub(super) toggle: Option<NodeId>,
    pub(super) list: OnceLock<List>,
    pub(super) group: DropdownGroup,
    is_open: AtomicBool,
    selectable: AtomicBool,
    prevent_default: AtomicBool,
    select_first_on_open: AtomicBool,
    on_select: Emitter<DropdownSelectEvent>,
    pub(super) disposables: Mutex<Disposables>,
    membership: Mutex<Option<Membership>>,
    destroyed: AtomicBool,
}

/// A dropdown bound to a root element.
///
/// The root should contain a `.dropdown-toggle` trigger and a
/// `.dropdown-menu` list; either may be missing, in which case that part is
/// simply not wired. While open, the root carries the `open` class.
///
/// `Dropdown` is a cheap handle; clones share state. The widget lives until
/// [`destroy`](Self::destroy) is called or the last handle is dropped, at
/// which point its listeners are released and it leaves its group.
///
/// # Example
///
/// ```ignore
/// let group = DropdownGroup::new();
/// let root = doc.mount(doc.body(), markup)?;
/// let dropdown = Dropdown::new(&doc, root, &group, DropdownOptions::default())?;
/// dropdown.on_select(|event| println!("chose {:?}", event.selected_item));
///
/// doc.click(dropdown.toggle_element().unwrap()); // opens
/// doc.click(doc.body());                          // closes
/// ```
#[derive(Clone)]
pub struct Dropdown {
    pub(crate) inner: Arc<DropdownInner>,
}

impl Dropdown {
    /// Bind a dropdown to `root`, wire its trigger, menu and document
    /// listeners, and join `group`.
    pub fn new(
        document: &Document,
        root: NodeId,
        group: &DropdownGroup,
        options: DropdownOptions,
    ) -> Result<Self> {
        if !document.exists(root) {
            return Err(StrapError::Dom(webdom::DomError::UnknownNode(root)));
        }

        let toggle = document.query_class(root, TOGGLE_CLASS);
        if toggle.is_none() {
            debug!("Dropdown at {:?} has no .{} trigger", root, TOGGLE_CLASS);
        }

        let dropdown = Self {
            inner: Arc::new(DropdownInner {
                id: DropdownId::new(),
                document: document.clone(),
                root,
                toggle,
                list: OnceLock::new(),
                group: group.clone(),
                is_open: AtomicBool::new(false),
                selectable: AtomicBool::new(options.selectable),
                prevent_default: AtomicBool::new(options.prevent_default),
                select_first_on_open: AtomicBool::new(options.select_first_on_open),
                on_select: Emitter::new(),
                disposables: Mutex::new(Disposables::new()),
                membership: Mutex::new(None),
                destroyed: AtomicBool::new(false),
            }),
        };

        // Markup may arrive with a stale open class; start closed.
        document.remove_class(root, OPEN_CLASS)?;
        document.set_attr(root, BOUND_ATTR, dropdown.id().to_string())?;

        super::events::bind(&dropdown, options)?;

        *dropdown.membership() = Some(group.register(&dropdown.inner));
        debug!("{} bound to {:?} ({:?})", dropdown.id(), root, options);
        Ok(dropdown)
    }

    pub fn id(&self) -> DropdownId {
        self.inner.id
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// The element this dropdown governs.
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    pub fn toggle_element(&self) -> Option<NodeId> {
        self.inner.toggle
    }

    /// The menu list, if the markup contains one.
    pub fn list(&self) -> Option<&List> {
        self.inner.list.get()
    }

    pub fn group(&self) -> &DropdownGroup {
        &self.inner.group
    }

    /// Whether both handles refer to the same widget.
    pub fn ptr_eq(&self, other: &Dropdown) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn membership(&self) -> MutexGuard<'_, Option<Membership>> {
        self.inner
            .membership
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Open/close state
    // -------------------------------------------------------------------------

    /// Check if the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.inner.is_open.load(Ordering::SeqCst)
    }

    /// Whether the root carries the `disabled` class or attribute. Disabled
    /// dropdowns ignore open, close and toggle requests.
    pub fn is_disabled(&self) -> bool {
        let doc = &self.inner.document;
        doc.has_class(self.inner.root, DISABLED_CLASS)
            || doc.has_attr(self.inner.root, DISABLED_ATTR)
    }

    /// Set or remove the `disabled` attribute on the root.
    pub fn set_disabled(&self, disabled: bool) -> Result<()> {
        let doc = &self.inner.document;
        if disabled {
            doc.set_attr(self.inner.root, DISABLED_ATTR, "")?;
        } else {
            doc.remove_attr(self.inner.root, DISABLED_ATTR)?;
        }
        Ok(())
    }

    /// Open the dropdown, closing every other member of its group first.
    ///
    /// Highlights the first menu item if `select_first_on_open` is set and
    /// moves focus to the menu. Returns false if the dropdown is disabled.
    pub fn open(&self) -> bool {
        if self.is_disabled() {
            debug!("{} is disabled, not opening", self.id());
            return false;
        }

        // The sweep closes this dropdown too; state is set after it finishes.
        self.inner.group.close_all();

        if !self.is_open() {
            self.set_open_class(true);
        }
        self.inner.is_open.store(true, Ordering::SeqCst);

        if let Some(list) = self.list() {
            if self.select_first_on_open() {
                list.select_first();
            }
            if let Err(err) = self.inner.document.focus(list.root()) {
                warn!("{} could not focus its menu: {}", self.id(), err);
            }
        }

        debug!("{} opened", self.id());
        true
    }

    /// Close the dropdown. Returns false if the dropdown is disabled.
    pub fn close(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        if self.inner.is_open.swap(false, Ordering::SeqCst) {
            self.set_open_class(false);
            debug!("{} closed", self.id());
        }
        true
    }

    /// Toggle the dropdown open/closed.
    ///
    /// When called for a trigger event, the event's default action is
    /// suppressed and it stops propagating, so document-level listeners do
    /// not see the same click. Returns false if the dropdown is disabled.
    pub fn toggle(&self, event: Option<&mut Event>) -> bool {
        if self.is_disabled() {
            return false;
        }
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
        if let Some(event) = event {
            event.prevent_default();
            event.stop_propagation();
        }
        true
    }

    fn set_open_class(&self, open: bool) {
        let doc = &self.inner.document;
        let result = if open {
            doc.add_class(self.inner.root, OPEN_CLASS)
        } else {
            doc.remove_class(self.inner.root, OPEN_CLASS)
        };
        if let Err(err) = result {
            warn!("{} could not update .{}: {}", self.id(), OPEN_CLASS, err);
        }
    }

    // -------------------------------------------------------------------------
    // Options
    // -------------------------------------------------------------------------

    pub fn selectable(&self) -> bool {
        self.inner.selectable.load(Ordering::SeqCst)
    }

    /// Set whether menu items can be chosen; forwarded to the menu list.
    pub fn set_selectable(&self, selectable: bool) {
        self.inner.selectable.store(selectable, Ordering::SeqCst);
        if let Some(list) = self.list() {
            list.set_selectable(selectable);
        }
    }

    pub fn prevent_default(&self) -> bool {
        self.inner.prevent_default.load(Ordering::SeqCst)
    }

    /// Set whether menu item clicks suppress their default action; forwarded
    /// to the menu list.
    pub fn set_prevent_default(&self, prevent_default: bool) {
        self.inner.prevent_default.store(prevent_default, Ordering::SeqCst);
        if let Some(list) = self.list() {
            list.set_prevent_default(prevent_default);
        }
    }

    pub fn select_first_on_open(&self) -> bool {
        self.inner.select_first_on_open.load(Ordering::SeqCst)
    }

    pub fn set_select_first_on_open(&self, select_first_on_open: bool) {
        self.inner
            .select_first_on_open
            .store(select_first_on_open, Ordering::SeqCst);
    }

    /// Current options, as they would be passed to [`Dropdown::new`].
    pub fn options(&self) -> DropdownOptions {
        DropdownOptions::new()
            .selectable(self.selectable())
            .prevent_default(self.prevent_default())
            .select_first_on_open(self.select_first_on_open())
    }

    // -------------------------------------------------------------------------
    // Select event
    // -------------------------------------------------------------------------

    /// Listen for menu item selections.
    pub fn on_select<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&DropdownSelectEvent) + Send + Sync + 'static,
    {
        self.inner.on_select.on(handler)
    }

    /// Remove a select handler. Returns true if it was registered.
    pub fn off_select(&self, id: HandlerId) -> bool {
        self.inner.on_select.off(id)
    }

    /// Close, then report `item` to select listeners.
    pub(super) fn handle_list_select(&self, item: NodeId) {
        self.close();
        let delivered = self
            .inner
            .on_select
            .emit(&DropdownSelectEvent { selected_item: item });
        debug!("{} selected {:?} ({} listeners)", self.id(), item, delivered);
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Release every listener (trigger, form, document click, menu), leave
    /// the group and unmark the root. Safe to call more than once.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner
            .disposables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dispose();
        if let Some(list) = self.list() {
            list.destroy();
        }
        self.membership().take();
        if let Err(err) = self.inner.document.remove_attr(self.inner.root, BOUND_ATTR) {
            warn!("{} could not unmark its root: {}", self.id(), err);
        }
        debug!("{} destroyed", self.id());
    }
}

impl Drop for DropdownInner {
    fn drop(&mut self) {
        if !self.destroyed.load(Ordering::SeqCst) {
            // Listeners and membership release themselves; only the marker
            // attribute needs explicit cleanup.
            let _ = self.document.remove_attr(self.root, BOUND_ATTR);
            debug!("{} dropped", self.id);
        }
    }
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("id", &self.inner.id)
            .field("root", &self.inner.root)
            .field("is_open", &self.is_open())
            .field("has_list", &self.list().is_some())
            .finish()
    }
}
