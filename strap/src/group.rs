//! Membership list of live dropdowns.
//!
//! A [`DropdownGroup`] replaces scanning the document for widgets: every
//! dropdown registers with its group when it is created and leaves it when it
//! is destroyed or dropped. The group only holds weak references, so it never
//! keeps a dropdown alive.
//!
//! Members whose root has been detached from the document are skipped by
//! [`members`](DropdownGroup::members) and therefore by the sweep.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use log::{debug, trace};

use crate::dropdown::{Dropdown, DropdownId, DropdownInner};

#[derive(Default)]
struct GroupInner {
    members: RwLock<BTreeMap<DropdownId, Weak<DropdownInner>>>,
}

impl GroupInner {
    fn members(&self) -> RwLockReadGuard<'_, BTreeMap<DropdownId, Weak<DropdownInner>>> {
        self.members.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn members_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<DropdownId, Weak<DropdownInner>>> {
        self.members.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A set of dropdowns of which at most one is open.
///
/// Cheap to clone; clones share the same membership.
#[derive(Clone, Default)]
pub struct DropdownGroup {
    inner: Arc<GroupInner>,
}

impl DropdownGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, dropdown: &Arc<DropdownInner>) -> Membership {
        let id = dropdown.id;
        self.inner.members_mut().insert(id, Arc::downgrade(dropdown));
        trace!("{} joined group", id);
        Membership {
            id,
            group: Arc::downgrade(&self.inner),
        }
    }

    /// Live members whose root is attached to their document, in creation
    /// order.
    pub fn members(&self) -> Vec<Dropdown> {
        let (live, dead): (Vec<_>, Vec<_>) = self
            .inner
            .members()
            .iter()
            .map(|(id, weak)| (*id, weak.upgrade()))
            .partition(|(_, inner)| inner.is_some());

        if !dead.is_empty() {
            let mut members = self.inner.members_mut();
            for (id, _) in &dead {
                members.remove(id);
            }
        }

        live.into_iter()
            .filter_map(|(_, inner)| inner)
            .map(|inner| Dropdown { inner })
            .filter(|dropdown| dropdown.document().is_attached(dropdown.root()))
            .collect()
    }

    /// Members that are currently open.
    pub fn open_members(&self) -> Vec<Dropdown> {
        self.members().into_iter().filter(Dropdown::is_open).collect()
    }

    /// Close every member, including whichever one is about to open.
    pub fn close_all(&self) {
        let members = self.members();
        debug!("Sweeping {} dropdowns", members.len());
        for dropdown in &members {
            dropdown.close();
        }
    }

    /// Whether `dropdown` is registered with this group.
    pub fn contains(&self, dropdown: &Dropdown) -> bool {
        self.inner.members().contains_key(&dropdown.id())
    }

    /// Number of registered members, attached or not.
    pub fn len(&self) -> usize {
        self.inner
            .members()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DropdownGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownGroup")
            .field("members", &self.len())
            .finish()
    }
}

/// A dropdown's registration with a group; leaving the group on drop.
pub(crate) struct Membership {
    id: DropdownId,
    group: Weak<GroupInner>,
}

impl Drop for Membership {
    fn drop(&mut self) {
        if let Some(group) = self.group.upgrade()
            && group.members_mut().remove(&self.id).is_some()
        {
            trace!("{} left group", self.id);
        }
    }
}
