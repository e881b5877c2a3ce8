//! Event listener storage and subscription tokens.

use std::fmt;
use std::sync::{Arc, Weak};

use log::trace;

use crate::document::DocumentInner;
use crate::event::{Event, EventType};
use crate::node::NodeId;
use crate::selector::Selector;

slotmap::new_key_type! {
    /// Identifies a registered listener.
    pub struct ListenerId;
}

/// Shared listener callback.
pub type Handler = Arc<dyn Fn(&mut Event) + Send + Sync>;

pub(crate) struct Listener {
    pub node: NodeId,
    pub kinds: Vec<EventType>,
    pub selector: Option<Selector>,
    pub handler: Handler,
    /// Registration order; dispatch runs listeners on a node in this order.
    pub seq: u64,
}

impl Listener {
    pub fn wants(&self, node: NodeId, kind: EventType) -> bool {
        self.node == node && self.kinds.contains(&kind)
    }
}

/// Token for a registered listener.
///
/// The listener stays registered for as long as the token lives. Dropping the
/// token (or calling [`remove`](Self::remove)) deregisters it. Use
/// [`detach`](Self::detach) to keep the listener for the lifetime of the
/// document.
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
    id: ListenerId,
    document: Weak<DocumentInner>,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, document: Weak<DocumentInner>) -> Self {
        Self {
            id,
            document,
            active: true,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered with a live document.
    pub fn is_active(&self) -> bool {
        self.active
            && self
                .document
                .upgrade()
                .is_some_and(|doc| doc.has_listener(self.id))
    }

    /// Deregister the listener now.
    pub fn remove(mut self) {
        self.release();
    }

    /// Give up the token without deregistering the listener.
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(doc) = self.document.upgrade()
            && doc.remove_listener(self.id)
        {
            trace!("Released listener {:?}", self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
