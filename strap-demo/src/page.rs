//! Markup for the demo page.

use strap::parser::{PROPS_ATTR, TYPE_ATTR};
use webdom::Element;

fn menu(prefix: &str, entries: &[&str]) -> Element {
    Element::ul()
        .class("dropdown-menu")
        .attr("role", "menu")
        .children(entries.iter().map(|entry| match *entry {
            "-" => Element::li().class("divider"),
            label => Element::li()
                .id(format!("{}-{}", prefix, label.to_lowercase().replace(' ', "-")))
                .text(label),
        }))
}

fn toggle(prefix: &str, label: &str) -> Element {
    Element::a()
        .id(format!("{}-toggle", prefix))
        .class("dropdown-toggle")
        .attr("href", "#")
        .text(label)
}

/// A navigation bar with four dropdowns: two plain, one disabled and one
/// holding a login form.
pub fn navbar() -> Element {
    Element::div()
        .id("navbar")
        .class("navbar")
        .child(
            Element::span()
                .id("file")
                .class("dropdown")
                .child(toggle("file", "File"))
                .child(menu("file", &["New", "Open", "-", "Save"])),
        )
        .child(
            Element::span()
                .id("edit")
                .attr(TYPE_ATTR, "dropdown")
                .attr(PROPS_ATTR, r#"{"preventDefault": true}"#)
                .child(toggle("edit", "Edit"))
                .child(menu("edit", &["Undo", "Redo", "-", "Cut", "Copy", "Paste"])),
        )
        .child(
            Element::span()
                .id("help")
                .class("dropdown disabled")
                .child(toggle("help", "Help"))
                .child(menu("help", &["About"])),
        )
        .child(
            Element::span()
                .id("account")
                .class("dropdown")
                .attr(PROPS_ATTR, r#"{"selectFirstOnOpen": true}"#)
                .child(toggle("account", "Account"))
                .child(menu("account", &["Profile", "Sign out"]))
                .child(
                    Element::form()
                        .id("account-login")
                        .child(Element::input().id("account-user").attr("name", "user"))
                        .child(Element::button().text("Sign in")),
                ),
        )
}

pub fn content() -> Element {
    Element::div()
        .id("content")
        .text("Click a menu above.")
}
