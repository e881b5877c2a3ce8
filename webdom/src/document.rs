//! The document tree, focus tracking and event dispatch.
//!
//! A [`Document`] is a cheap clonable handle; every clone sees the same tree.
//! Nodes live in an arena keyed by [`NodeId`] and can be detached and
//! re-attached without invalidating their handles.
//!
//! Dispatch never holds an internal lock while a handler runs, so handlers
//! are free to mutate the tree, move focus, or add and remove listeners
//! (including their own).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{trace, warn};
use slotmap::SlotMap;

use crate::element::Element;
use crate::error::{DomError, Result};
use crate::event::{Event, EventType, Key};
use crate::listener::{Handler, Listener, ListenerId, Subscription};
use crate::node::{NodeData, NodeId};
use crate::selector::Selector;

struct Tree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    body: NodeId,
}

impl Tree {
    fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new("#document"));
        let mut body_data = NodeData::new("body");
        body_data.parent = Some(root);
        let body = nodes.insert(body_data);
        nodes[root].children.push(body);
        Self { nodes, root, body }
    }

    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    /// Inclusive containment, like `Node.contains`.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            out.push(id);
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        out
    }

    /// Descendants of `root` in document order, excluding `root` itself.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn detach(&mut self, node: NodeId) -> Result<()> {
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != node);
            }
            self.node_mut(node)?.parent = None;
        }
        Ok(())
    }
}

pub(crate) struct DocumentInner {
    tree: RwLock<Tree>,
    listeners: RwLock<SlotMap<ListenerId, Listener>>,
    focused: RwLock<Option<NodeId>>,
    next_seq: AtomicU64,
}

impl DocumentInner {
    fn tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn tree_mut(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> RwLockReadGuard<'_, SlotMap<ListenerId, Listener>> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners_mut(&self) -> RwLockWriteGuard<'_, SlotMap<ListenerId, Listener>> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners().contains_key(id)
    }

    pub(crate) fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners_mut().remove(id).is_some()
    }
}

/// An in-memory document: element tree, focus and event listeners.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.tree().nodes.len())
            .field("listeners", &self.listener_count())
            .field("focused", &self.focused())
            .finish()
    }
}

impl Document {
    /// Create a document containing only the root and an empty `body`.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                tree: RwLock::new(Tree::new()),
                listeners: RwLock::new(SlotMap::with_key()),
                focused: RwLock::new(None),
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    /// The document node; document-wide listeners attach here.
    pub fn root(&self) -> NodeId {
        self.inner.tree().root
    }

    pub fn body(&self) -> NodeId {
        self.inner.tree().body
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Tree construction
    // -------------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.tree_mut().nodes.insert(NodeData::new(tag))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached somewhere else.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.inner.tree_mut();
        tree.node(parent)?;
        tree.node(child)?;
        if tree.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        tree.detach(child)?;
        tree.node_mut(child)?.parent = Some(parent);
        tree.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Create the nodes described by `element` and append them under `parent`.
    /// Returns the handle of the new subtree root.
    pub fn mount(&self, parent: NodeId, element: Element) -> Result<NodeId> {
        self.inner.tree().node(parent)?;
        let node = self.build(element);
        self.append_child(parent, node)?;
        Ok(node)
    }

    fn build(&self, element: Element) -> NodeId {
        let Element {
            tag,
            classes,
            attrs,
            text,
            children,
        } = element;

        let id = {
            let mut data = NodeData::new(tag);
            data.classes = classes;
            data.attrs = attrs.into_iter().collect();
            data.text = text;
            self.inner.tree_mut().nodes.insert(data)
        };

        for child in children {
            let child_id = self.build(child);
            let mut tree = self.inner.tree_mut();
            tree.nodes[child_id].parent = Some(id);
            tree.nodes[id].children.push(child_id);
        }
        id
    }

    /// Detach `node` (and its subtree) from its parent. The handles stay
    /// valid and the subtree can be appended again. Focus inside the removed
    /// subtree is cleared.
    pub fn remove(&self, node: NodeId) -> Result<()> {
        self.inner.tree_mut().detach(node)?;
        let focused = self.focused();
        if let Some(focused) = focused
            && self.contains(node, focused)
        {
            self.blur();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    pub fn exists(&self, node: NodeId) -> bool {
        self.inner.tree().nodes.contains_key(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.tree().nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .tree()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Ancestors from the parent up to the document root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.tree().ancestors(node)
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.inner.tree().descendants(root)
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.tree().contains(ancestor, node)
    }

    /// Whether the node is connected to the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let tree = self.inner.tree();
        tree.contains(tree.root, node)
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.tree().nodes.get(node).map(|n| n.tag.clone())
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.inner.tree().nodes.get(node).and_then(|n| n.text.clone())
    }

    pub fn set_text(&self, node: NodeId, text: impl Into<String>) -> Result<()> {
        self.inner.tree_mut().node_mut(node)?.text = Some(text.into());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First descendant of `root` carrying `class`, in document order.
    pub fn query_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        let tree = self.inner.tree();
        tree.descendants(root)
            .into_iter()
            .find(|&id| tree.nodes[id].has_class(class))
    }

    pub fn query_all_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let tree = self.inner.tree();
        tree.descendants(root)
            .into_iter()
            .filter(|&id| tree.nodes[id].has_class(class))
            .collect()
    }

    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        let tree = self.inner.tree();
        tree.descendants(root)
            .into_iter()
            .find(|&id| selector.matches(&tree.nodes[id]))
    }

    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let tree = self.inner.tree();
        tree.descendants(root)
            .into_iter()
            .filter(|&id| selector.matches(&tree.nodes[id]))
            .collect()
    }

    /// Find an attached element by its `id` attribute.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_selector(self.root(), &Selector::Id(id.to_string()))
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.inner
            .tree()
            .nodes
            .get(node)
            .is_some_and(|n| selector.matches(n))
    }

    // -------------------------------------------------------------------------
    // Classes and attributes
    // -------------------------------------------------------------------------

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .tree()
            .nodes
            .get(node)
            .is_some_and(|n| n.has_class(class))
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.inner
            .tree()
            .nodes
            .get(node)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    /// Add a class. Returns true if the class was not already present.
    pub fn add_class(&self, node: NodeId, class: &str) -> Result<bool> {
        let mut tree = self.inner.tree_mut();
        let data = tree.node_mut(node)?;
        if data.has_class(class) {
            return Ok(false);
        }
        data.classes.push(class.to_string());
        Ok(true)
    }

    /// Remove a class. Returns true if the class was present.
    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<bool> {
        let mut tree = self.inner.tree_mut();
        let data = tree.node_mut(node)?;
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        Ok(data.classes.len() != before)
    }

    /// Toggle a class. Returns whether the class is present afterwards.
    pub fn toggle_class(&self, node: NodeId, class: &str) -> Result<bool> {
        if self.remove_class(node, class)? {
            Ok(false)
        } else {
            self.add_class(node, class)?;
            Ok(true)
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .tree()
            .nodes
            .get(node)
            .and_then(|n| n.attrs.get(name).cloned())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.inner
            .tree()
            .nodes
            .get(node)
            .is_some_and(|n| n.attrs.contains_key(name))
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        self.inner
            .tree_mut()
            .node_mut(node)?
            .attrs
            .insert(name.to_string(), value.into());
        Ok(())
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attr(&self, node: NodeId, name: &str) -> Result<bool> {
        Ok(self
            .inner
            .tree_mut()
            .node_mut(node)?
            .attrs
            .remove(name)
            .is_some())
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focused(&self) -> Option<NodeId> {
        *self
            .inner
            .focused
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Move input focus to `node`. Returns true if focus changed.
    pub fn focus(&self, node: NodeId) -> Result<bool> {
        self.inner.tree().node(node)?;
        let mut focused = self
            .inner
            .focused
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *focused == Some(node) {
            return Ok(false);
        }
        trace!("Focus {:?} -> {:?}", *focused, node);
        *focused = Some(node);
        Ok(true)
    }

    /// Clear focus. Returns true if something was focused.
    pub fn blur(&self) -> bool {
        self.inner
            .focused
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Listen for `kinds` on `node` (and, by bubbling, its descendants).
    pub fn on<F>(&self, node: NodeId, kinds: &[EventType], handler: F) -> Subscription
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        self.register(node, kinds, None, Arc::new(handler))
    }

    /// Listen for `kinds` on descendants of `node` matching `selector`.
    ///
    /// The handler runs when some node on the path from the event target up
    /// to (but excluding) `node` matches; `Event::delegate_target` holds the
    /// closest match.
    pub fn on_selector<F>(
        &self,
        node: NodeId,
        selector: &str,
        kinds: &[EventType],
        handler: F,
    ) -> Result<Subscription>
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        let selector = Selector::parse(selector)?;
        Ok(self.register(node, kinds, Some(selector), Arc::new(handler)))
    }

    fn register(
        &self,
        node: NodeId,
        kinds: &[EventType],
        selector: Option<Selector>,
        handler: Handler,
    ) -> Subscription {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = self.inner.listeners_mut().insert(Listener {
            node,
            kinds: kinds.to_vec(),
            selector,
            handler,
            seq,
        });
        trace!("Registered listener {:?} on {:?} for {:?}", id, node, kinds);
        Subscription::new(id, Arc::downgrade(&self.inner))
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }

    /// Number of listeners registered directly on `node`.
    pub fn listener_count_on(&self, node: NodeId) -> usize {
        self.inner
            .listeners()
            .values()
            .filter(|l| l.node == node)
            .count()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    pub fn click(&self, target: NodeId) -> Event {
        self.dispatch(target, EventType::Click)
    }

    pub fn touch(&self, target: NodeId) -> Event {
        self.dispatch(target, EventType::TouchStart)
    }

    /// Dispatch a key press at the focused node, or `body` if nothing
    /// attached has focus.
    pub fn key_down(&self, key: Key) -> Event {
        let target = self
            .focused()
            .filter(|&node| self.is_attached(node))
            .unwrap_or_else(|| self.body());
        self.dispatch_event(Event::key_down(target, key))
    }

    pub fn dispatch(&self, target: NodeId, kind: EventType) -> Event {
        self.dispatch_event(Event::new(kind, target))
    }

    /// Run the bubbling phase for `event` and return it with its final flags.
    pub fn dispatch_event(&self, mut event: Event) -> Event {
        if !self.exists(event.target) {
            warn!("Dispatch of {:?} to unknown node {:?}", event.kind, event.target);
            return event;
        }

        let mut path = vec![event.target];
        path.extend(self.ancestors(event.target));
        trace!("Dispatch {:?} at {:?} ({} nodes)", event.kind, event.target, path.len());

        for (depth, &node) in path.iter().enumerate() {
            event.current_target = node;

            let mut matching: Vec<(u64, ListenerId, Option<Selector>, Handler)> = self
                .inner
                .listeners()
                .iter()
                .filter(|(_, l)| l.wants(node, event.kind))
                .map(|(id, l)| (l.seq, id, l.selector.clone(), Arc::clone(&l.handler)))
                .collect();
            matching.sort_by_key(|(seq, ..)| *seq);

            for (_, id, selector, handler) in matching {
                // An earlier handler may have removed this one.
                if !self.inner.has_listener(id) {
                    continue;
                }
                event.delegate_target = match &selector {
                    Some(selector) => {
                        match path[..depth].iter().find(|&&n| self.matches(n, selector)) {
                            Some(&hit) => Some(hit),
                            None => continue,
                        }
                    }
                    None => None,
                };
                handler(&mut event);
            }
            event.delegate_target = None;

            if event.propagation_stopped() {
                trace!("Propagation of {:?} stopped at {:?}", event.kind, node);
                break;
            }
        }

        event
    }
}
