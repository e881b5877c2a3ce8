use std::sync::{Arc, Mutex};

use strap::dropdown::{BOUND_ATTR, OPEN_CLASS};
use strap::{Dropdown, DropdownGroup, DropdownOptions, DropdownSelectEvent};
use webdom::{Document, Element, EventType, Key, NodeId};

fn markup(id: &str) -> Element {
    Element::span()
        .id(id)
        .class("dropdown")
        .child(Element::a().class("dropdown-toggle").attr("href", "#").text("Dropdown"))
        .child(
            Element::ul()
                .class("dropdown-menu")
                .attr("role", "menu")
                .child(Element::li().child(Element::a().text("one")))
                .child(Element::li().child(Element::a().text("two")))
                .child(Element::li().child(Element::a().text("three"))),
        )
}

fn mount(doc: &Document, id: &str) -> NodeId {
    doc.mount(doc.body(), markup(id)).unwrap()
}

fn dropdown(doc: &Document, group: &DropdownGroup, id: &str) -> Dropdown {
    let root = mount(doc, id);
    Dropdown::new(doc, root, group, DropdownOptions::default()).unwrap()
}

fn items(dd: &Dropdown) -> Vec<NodeId> {
    dd.list().unwrap().items()
}

fn record(dd: &Dropdown) -> Arc<Mutex<Vec<DropdownSelectEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    dd.on_select(move |event| s.lock().unwrap().push(*event));
    seen
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_finds_trigger_and_menu() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    let toggle = dd.toggle_element().unwrap();
    assert!(doc.has_class(toggle, "dropdown-toggle"));
    let list = dd.list().unwrap();
    assert!(doc.has_class(list.root(), "dropdown-menu"));
    assert_eq!(list.items().len(), 3);

    assert!(!dd.is_open());
    assert!(!doc.has_class(dd.root(), OPEN_CLASS));
    assert_eq!(doc.attr(dd.root(), BOUND_ATTR), Some(dd.id().to_string()));
    assert!(group.contains(&dd));
}

#[test]
fn test_new_rejects_unknown_root() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let result = Dropdown::new(&doc, NodeId::default(), &group, DropdownOptions::default());
    assert!(result.is_err());
    assert!(group.is_empty());
}

#[test]
fn test_new_clears_stale_open_class() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = doc.mount(doc.body(), markup("dd1").class("open")).unwrap();
    let dd = Dropdown::new(&doc, root, &group, DropdownOptions::default()).unwrap();
    assert!(!dd.is_open());
    assert!(!doc.has_class(root, OPEN_CLASS));
}

#[test]
fn test_missing_trigger_and_menu_are_tolerated() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = doc.mount(doc.body(), Element::span().class("dropdown")).unwrap();
    let dd = Dropdown::new(&doc, root, &group, DropdownOptions::default()).unwrap();

    assert!(dd.toggle_element().is_none());
    assert!(dd.list().is_none());

    assert!(dd.open());
    assert!(dd.is_open());
    assert_eq!(doc.focused(), None);
    assert!(dd.close());
    assert!(!dd.is_open());

    dd.set_selectable(false);
    dd.set_prevent_default(true);
    assert!(!dd.selectable());
    assert!(dd.prevent_default());
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_toggle_parity() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    for n in 1..=7 {
        assert!(dd.toggle(None));
        assert_eq!(dd.is_open(), n % 2 == 1, "after {n} toggles");
        assert_eq!(doc.has_class(dd.root(), OPEN_CLASS), dd.is_open());
    }
}

#[test]
fn test_open_and_close_are_idempotent() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    assert!(dd.close());
    assert!(!dd.is_open());

    assert!(dd.open());
    assert!(dd.open());
    assert!(dd.is_open());
    assert_eq!(
        doc.classes(dd.root()).iter().filter(|c| *c == OPEN_CLASS).count(),
        1
    );

    assert!(dd.close());
    assert!(dd.close());
    assert!(!dd.is_open());
    assert!(!doc.has_class(dd.root(), OPEN_CLASS));
}

#[test]
fn test_open_focuses_menu() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    dd.open();
    assert_eq!(doc.focused(), Some(dd.list().unwrap().root()));
    assert_eq!(dd.list().unwrap().highlighted(), None);
}

#[test]
fn test_select_first_on_open() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = mount(&doc, "dd1");
    let options = DropdownOptions::new().select_first_on_open(true);
    let dd = Dropdown::new(&doc, root, &group, options).unwrap();

    dd.open();
    let first = items(&dd)[0];
    assert_eq!(dd.list().unwrap().highlighted(), Some(first));
    assert!(doc.has_class(first, "active"));
}

#[test]
fn test_select_first_on_open_is_live() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    dd.set_select_first_on_open(true);
    assert!(dd.options().select_first_on_open);
    dd.open();
    assert_eq!(dd.list().unwrap().highlighted(), Some(items(&dd)[0]));
}

// ============================================================================
// Disabled guard
// ============================================================================

#[test]
fn test_disabled_class_blocks_everything() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    doc.add_class(dd.root(), "disabled").unwrap();
    assert!(dd.is_disabled());
    assert!(!dd.toggle(None));
    assert!(!dd.open());
    assert!(!dd.is_open());

    doc.remove_class(dd.root(), "disabled").unwrap();
    dd.open();
    doc.add_class(dd.root(), "disabled").unwrap();
    assert!(!dd.close());
    assert!(!dd.toggle(None));
    assert!(dd.is_open());
}

#[test]
fn test_disabled_attribute_blocks_everything() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    dd.set_disabled(true).unwrap();
    assert!(doc.has_attr(dd.root(), "disabled"));
    assert!(dd.is_disabled());
    assert!(!dd.open());
    assert!(!dd.is_open());

    dd.set_disabled(false).unwrap();
    assert!(!dd.is_disabled());
    assert!(dd.open());
}

#[test]
fn test_disabled_trigger_click_is_not_consumed() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    dd.set_disabled(true).unwrap();

    let event = doc.click(dd.toggle_element().unwrap());
    assert!(!dd.is_open());
    assert!(!event.default_prevented());
    assert!(!event.propagation_stopped());
}

// ============================================================================
// Trigger wiring
// ============================================================================

#[test]
fn test_trigger_click_toggles_and_consumes_event() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let toggle = dd.toggle_element().unwrap();

    let event = doc.click(toggle);
    assert!(dd.is_open());
    assert!(event.default_prevented());
    assert!(event.propagation_stopped());

    doc.click(toggle);
    assert!(!dd.is_open());
}

#[test]
fn test_trigger_touch_toggles() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    doc.touch(dd.toggle_element().unwrap());
    assert!(dd.is_open());
}

#[test]
fn test_click_on_trigger_child_toggles() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = doc
        .mount(
            doc.body(),
            Element::span()
                .child(Element::a().class("dropdown-toggle").child(Element::new("b").id("caret")))
                .child(Element::ul().class("dropdown-menu")),
        )
        .unwrap();
    let dd = Dropdown::new(&doc, root, &group, DropdownOptions::default()).unwrap();

    doc.click(doc.get_by_id("caret").unwrap());
    assert!(dd.is_open());
}

// ============================================================================
// Outside clicks and forms
// ============================================================================

#[test]
fn test_outside_click_closes() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let elsewhere = doc.mount(doc.body(), Element::div().id("content")).unwrap();

    dd.open();
    doc.click(doc.body());
    assert!(!dd.is_open());

    dd.open();
    doc.click(elsewhere);
    assert!(!dd.is_open());
}

#[test]
fn test_outside_touch_does_not_sweep() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    dd.open();
    doc.touch(doc.body());
    assert!(dd.is_open());
}

#[test]
fn test_form_click_is_isolated() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = doc
        .mount(
            doc.body(),
            markup("dd1").child(
                Element::form()
                    .id("login")
                    .child(Element::input().id("user"))
                    .child(Element::button().id("submit")),
            ),
        )
        .unwrap();
    let dd = Dropdown::new(&doc, root, &group, DropdownOptions::default()).unwrap();

    dd.open();
    let event = doc.click(doc.get_by_id("user").unwrap());
    assert!(dd.is_open());
    assert!(event.propagation_stopped());
    assert!(!event.default_prevented());

    doc.touch(doc.get_by_id("login").unwrap());
    assert!(dd.is_open());

    doc.click(doc.body());
    assert!(!dd.is_open());
}

#[test]
fn test_form_inside_menu_is_isolated() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = doc
        .mount(
            doc.body(),
            Element::span()
                .child(Element::a().class("dropdown-toggle"))
                .child(
                    Element::ul()
                        .class("dropdown-menu")
                        .child(Element::li().child(Element::form().child(Element::input().id("q")))),
                ),
        )
        .unwrap();
    let dd = Dropdown::new(&doc, root, &group, DropdownOptions::default()).unwrap();
    let seen = record(&dd);

    dd.open();
    doc.click(doc.get_by_id("q").unwrap());
    // The item listener runs on the menu, before the form handler on the
    // root stops propagation, so the click still chooses the item.
    assert!(!dd.is_open());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

// ============================================================================
// List delegation
// ============================================================================

#[test]
fn test_item_click_closes_and_emits_select_once() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let seen = record(&dd);
    let second = items(&dd)[1];
    let anchor = doc.children(second)[0];

    dd.open();
    doc.click(anchor);

    assert!(!dd.is_open());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![DropdownSelectEvent {
            selected_item: second
        }]
    );
}

#[test]
fn test_list_select_callback_round_trip() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let seen = record(&dd);
    let third = items(&dd)[2];

    dd.open();
    assert!(dd.list().unwrap().choose(third));
    assert!(!dd.is_open());
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(seen.lock().unwrap()[0].selected_item, third);
}

#[test]
fn test_off_select_stops_delivery() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    let id = dd.on_select(move |_| *c.lock().unwrap() += 1);

    dd.list().unwrap().choose(items(&dd)[0]);
    assert!(dd.off_select(id));
    dd.list().unwrap().choose(items(&dd)[0]);
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_keyboard_selection() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let seen = record(&dd);

    doc.click(dd.toggle_element().unwrap());
    doc.key_down(Key::Down);
    doc.key_down(Key::Down);
    let event = doc.key_down(Key::Enter);

    assert!(event.default_prevented());
    assert!(!dd.is_open());
    assert_eq!(seen.lock().unwrap()[0].selected_item, items(&dd)[1]);
}

#[test]
fn test_escape_closes() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let seen = record(&dd);

    dd.open();
    let event = doc.key_down(Key::Escape);
    assert!(!dd.is_open());
    assert!(event.propagation_stopped());
    assert!(seen.lock().unwrap().is_empty());

    dd.list().unwrap().escape();
    assert!(!dd.is_open());
}

#[test]
fn test_selectable_is_forwarded() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = mount(&doc, "dd1");
    let options = DropdownOptions::new().selectable(false);
    let dd = Dropdown::new(&doc, root, &group, options).unwrap();
    let seen = record(&dd);
    assert!(!dd.list().unwrap().selectable());

    dd.open();
    doc.click(items(&dd)[0]);
    // Not chosen, but the click still reaches the document and sweeps.
    assert!(!dd.is_open());
    assert!(seen.lock().unwrap().is_empty());

    dd.set_selectable(true);
    assert!(dd.list().unwrap().selectable());
    dd.open();
    doc.click(items(&dd)[0]);
    assert!(!dd.is_open());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_prevent_default_is_forwarded() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");
    let anchor = doc.children(items(&dd)[0])[0];

    dd.open();
    assert!(!doc.click(anchor).default_prevented());

    dd.set_prevent_default(true);
    assert!(dd.list().unwrap().prevent_default());
    dd.open();
    assert!(doc.click(anchor).default_prevented());
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_destroy_releases_every_listener() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let baseline = doc.listener_count();
    let dd = dropdown(&doc, &group, "dd1");
    assert!(doc.listener_count() > baseline);
    assert_eq!(doc.listener_count_on(doc.root()), 1);

    dd.destroy();
    assert!(dd.is_destroyed());
    assert_eq!(doc.listener_count(), baseline);
    assert!(!group.contains(&dd));
    assert!(!doc.has_attr(dd.root(), BOUND_ATTR));

    dd.destroy();
    assert_eq!(doc.listener_count(), baseline);
}

#[test]
fn test_destroyed_dropdown_ignores_outside_click() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let dd = dropdown(&doc, &group, "dd1");

    dd.open();
    dd.destroy();
    doc.click(doc.body());
    assert!(dd.is_open());

    doc.click(dd.toggle_element().unwrap());
    assert!(dd.is_open());
}

#[test]
fn test_dropping_last_handle_releases_listeners() {
    let doc = Document::new();
    let group = DropdownGroup::new();
    let root = {
        let dd = dropdown(&doc, &group, "dd1");
        let clone = dd.clone();
        drop(dd);
        assert_eq!(group.len(), 1);
        clone.root()
    };

    assert_eq!(doc.listener_count(), 0);
    assert!(group.is_empty());
    assert!(!doc.has_attr(root, BOUND_ATTR));
}
