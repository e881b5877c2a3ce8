//! Event wiring for the Dropdown widget.

use std::sync::{Arc, Weak};

use log::{debug, trace, warn};
use webdom::EventType;

use super::{Dropdown, DropdownInner, DropdownOptions, MENU_CLASS};
use crate::error::Result;
use crate::list::{List, ListCallbacks};

fn upgrade(weak: &Weak<DropdownInner>) -> Option<Dropdown> {
    weak.upgrade().map(|inner| Dropdown { inner })
}

/// Wire the trigger, the menu list, embedded forms and the document-wide
/// click sweep. Every subscription is owned by the dropdown's disposables.
pub(super) fn bind(dropdown: &Dropdown, options: DropdownOptions) -> Result<()> {
    let inner = &dropdown.inner;
    let doc = &inner.document;
    let mut subscriptions = Vec::new();

    if let Some(toggle) = inner.toggle {
        let weak = Arc::downgrade(inner);
        subscriptions.push(doc.on(
            toggle,
            &[EventType::Click, EventType::TouchStart],
            move |event| {
                if let Some(dropdown) = upgrade(&weak) {
                    dropdown.toggle(Some(event));
                }
            },
        ));
    }

    match doc.query_class(inner.root, MENU_CLASS) {
        Some(menu) => {
            let on_select = Arc::downgrade(inner);
            let on_escape = Arc::downgrade(inner);
            let callbacks = ListCallbacks::new()
                .on_select(move |event| {
                    if let Some(dropdown) = upgrade(&on_select) {
                        dropdown.handle_list_select(event.selected);
                    }
                })
                .on_escape(move || {
                    if let Some(dropdown) = upgrade(&on_escape) {
                        dropdown.close();
                    }
                });
            let list = List::new(doc, menu, options.list_options(), callbacks)?;
            if inner.list.set(list).is_err() {
                warn!("{} already has a menu list", inner.id);
            }
        }
        None => debug!("{} has no .{} menu", inner.id, MENU_CLASS),
    }

    // Interacting with an embedded form must not reach the document sweep.
    subscriptions.push(doc.on_selector(
        inner.root,
        "form",
        &[EventType::Click, EventType::TouchStart],
        |event| event.stop_propagation(),
    )?);

    let weak = Arc::downgrade(inner);
    subscriptions.push(doc.on(doc.root(), &[EventType::Click], move |event| {
        if let Some(dropdown) = upgrade(&weak) {
            trace!("{} sweeping after click on {:?}", dropdown.id(), event.target);
            dropdown.group().close_all();
        }
    }));

    let mut disposables = inner
        .disposables
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    for subscription in subscriptions {
        disposables.own(subscription);
    }
    Ok(())
}
