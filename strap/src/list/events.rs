//! Event handling for the List widget.

use std::sync::{Arc, Weak};

use log::trace;
use webdom::{Event, EventType, Key, Subscription};

use super::List;
use super::state::ListInner;
use crate::error::Result;

/// Register the list's click and key listeners.
pub(super) fn bind(list: &List) -> Result<Vec<Subscription>> {
    let doc = &list.inner.document;
    let root = list.inner.root;

    let weak = Arc::downgrade(&list.inner);
    let items = doc.on_selector(
        root,
        "li",
        &[EventType::Click, EventType::TouchStart],
        move |event| {
            if let Some(list) = upgrade(&weak) {
                on_item_click(&list, event);
            }
        },
    )?;

    let weak = Arc::downgrade(&list.inner);
    let keys = doc.on(root, &[EventType::KeyDown], move |event| {
        if let Some(list) = upgrade(&weak) {
            on_key(&list, event);
        }
    });

    Ok(vec![items, keys])
}

fn upgrade(weak: &Weak<ListInner>) -> Option<List> {
    weak.upgrade().map(|inner| List { inner })
}

fn on_item_click(list: &List, event: &mut Event) {
    let Some(item) = event.delegate_target else {
        return;
    };
    if !list.is_item(item) {
        trace!("Ignoring click on inert item {:?}", item);
        return;
    }
    if list.prevent_default() {
        event.prevent_default();
    }
    list.choose(item);
}

fn on_key(list: &List, event: &mut Event) {
    let Some(key) = event.key else {
        return;
    };

    let handled = match key {
        Key::Down => list.next().is_some(),
        Key::Up => list.previous().is_some(),
        Key::Home => list.select_first().is_some(),
        Key::End => list.select_last().is_some(),
        Key::Enter => match list.highlighted() {
            Some(item) => list.choose(item),
            None => false,
        },
        Key::Escape => {
            event.stop_propagation();
            list.escape();
            true
        }
        _ => false,
    };

    if handled {
        event.prevent_default();
    }
}
