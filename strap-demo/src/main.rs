mod page;

use std::fs::File;
use std::sync::{Arc, Mutex};

use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};
use strap::prelude::*;

/// One scripted user action.
enum Step {
    Click(&'static str),
    Touch(&'static str),
    Key(Key),
}

const SCRIPT: &[(&str, Step)] = &[
    ("open the file menu", Step::Click("file-toggle")),
    ("switch to the edit menu", Step::Click("edit-toggle")),
    ("move down twice", Step::Key(Key::Down)),
    ("", Step::Key(Key::Down)),
    ("choose the highlighted entry", Step::Key(Key::Enter)),
    ("try the disabled menu", Step::Click("help-toggle")),
    ("open the account menu", Step::Click("account-toggle")),
    ("type into its form", Step::Click("account-user")),
    ("click the page body", Step::Click("content")),
    ("tap the file menu", Step::Touch("file-toggle")),
    ("pick \"Save\"", Step::Click("file-save")),
    ("open the file menu", Step::Click("file-toggle")),
    ("dismiss with escape", Step::Key(Key::Escape)),
];

fn run() -> strap::Result<()> {
    let doc = Document::new();
    let nav = doc.mount(doc.body(), page::navbar())?;
    doc.mount(doc.body(), page::content())?;

    let group = DropdownGroup::new();
    let dropdowns = strap::parse(&doc, nav, &group)?;
    info!("Bound {} dropdowns", dropdowns.len());

    let chosen = Arc::new(Mutex::new(Vec::new()));
    for dropdown in &dropdowns {
        let doc = doc.clone();
        let chosen = chosen.clone();
        dropdown.on_select(move |event| {
            let label = doc.text(event.selected_item).unwrap_or_default();
            chosen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(label);
        });
    }

    for (label, step) in SCRIPT {
        let event = match step {
            Step::Click(id) | Step::Touch(id) => {
                let Some(node) = doc.get_by_id(id) else {
                    warn!("No element #{} on the page", id);
                    continue;
                };
                if matches!(step, Step::Click(_)) {
                    doc.click(node)
                } else {
                    doc.touch(node)
                }
            }
            Step::Key(key) => doc.key_down(*key),
        };
        if !label.is_empty() {
            println!("> {}", label);
        }
        for dropdown in &dropdowns {
            let state = if dropdown.is_disabled() {
                "disabled"
            } else if dropdown.is_open() {
                "open"
            } else {
                "closed"
            };
            println!(
                "    {:<8} {}",
                doc.attr(dropdown.root(), "id").unwrap_or_default(),
                state
            );
        }
        if event.default_prevented() {
            println!("    (default prevented)");
        }
    }

    let chosen = chosen
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    println!("chosen: {}", chosen.join(", "));

    for dropdown in &dropdowns {
        dropdown.destroy();
    }
    info!("Listeners left after teardown: {}", doc.listener_count());
    Ok(())
}

fn main() {
    let log_file = File::create("strap-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
