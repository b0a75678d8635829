//! End-to-end menu session tests: build a tree, drive the engine with input
//! lines, and observe navigation and the log panel window.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use qmenu::core::engine::{Effect, MenuEngine};
use qmenu::core::log_sink::LogSink;
use qmenu::core::menu::{ArgSpec, Item, Submenu};
use qmenu::core::registry::{ActionRef, ActionRegistry, action};

fn echo() -> ActionRef {
    ActionRef::Direct(action(|args, sink: &LogSink| {
        sink.append(args.to_string());
        Ok(())
    }))
}

fn clock() -> ActionRef {
    ActionRef::Direct(action(|_, sink: &LogSink| {
        sink.append("12:00:00");
        Ok(())
    }))
}

fn scenario_engine() -> MenuEngine {
    let mut root = Submenu::new("Main Menu");
    root.add_item(Item::new("Say Hello", echo()).args(ArgSpec::Literal("hi".into())))
        .unwrap();
    let utilities = root.add_submenu("Utilities").unwrap();
    utilities
        .add_item(Item::new("Show Time", clock()).args(ArgSpec::Literal("now".into())))
        .unwrap();

    MenuEngine::new(
        root,
        Arc::new(ActionRegistry::new()),
        Arc::new(LogSink::new()),
    )
}

#[test]
fn say_hello_logs_before_the_next_render() {
    let mut engine = scenario_engine();

    assert_eq!(engine.handle_line("1"), Effect::Continue);

    // The synchronous invocation finished before control returned, so the
    // very next render already sees the output.
    let window = engine.sink().window(10);
    let texts: Vec<&str> = window.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["hi", "Executed: Say Hello"]);
}

#[test]
fn entering_utilities_and_backing_out_restores_the_root_view() {
    let mut engine = scenario_engine();
    engine.handle_line("1");

    engine.handle_line("Utilities");
    let inside = engine.view();
    assert_eq!(inside.title, "Utilities");
    assert_eq!(inside.parent, Some("Main Menu".to_string()));
    assert_eq!(inside.entries.len(), 1);
    assert_eq!(inside.entries[0].name, "Show Time");

    engine.handle_line("0");
    let back = engine.view();
    assert_eq!(back.title, "Main Menu");
    assert_eq!(back.parent, None);
    let names: Vec<&str> = back.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Say Hello", "Utilities"]);

    // The log survives navigation untouched.
    assert_eq!(engine.sink().window(10)[0].text, "hi");
}

#[test]
fn json_menu_with_named_actions_runs_end_to_end() {
    let root = Submenu::from_json(
        r#"{
            "name": "Main Menu",
            "items": [
                { "type": "item", "name": "Greet", "action": "app.greet" },
                { "type": "submenu", "name": "Tools", "items": [
                    { "type": "item", "name": "Version", "action": "app.version", "args": "-" }
                ]}
            ]
        }"#,
    )
    .unwrap();

    let registry = ActionRegistry::new();
    registry.register_fn("app.greet", |args, sink: &LogSink| {
        sink.append(format!("hello {args}"));
        Ok(())
    });
    registry.register_fn("app.version", |_, sink: &LogSink| {
        sink.append("5.1");
        Ok(())
    });

    let mut engine = MenuEngine::new(root, Arc::new(registry), Arc::new(LogSink::new()));

    // "Greet" omitted its args, so the engine prompts for one line first.
    engine.handle_line("Greet");
    assert!(engine.view().prompt.is_some());
    engine.handle_line("world");
    assert_eq!(engine.sink().window(2)[0].text, "hello world");

    engine.handle_line("Tools");
    engine.handle_line("1");
    assert_eq!(engine.sink().window(2)[0].text, "5.1");
}

#[test]
fn threaded_action_reports_into_the_log_while_menu_stays_usable() {
    let mut root = Submenu::new("Main Menu");
    root.add_item(
        Item::new(
            "Slow Job",
            ActionRef::Direct(action(|_, sink: &LogSink| {
                thread::sleep(Duration::from_millis(300));
                sink.append("slow job finished");
                Ok(())
            })),
        )
        .args(ArgSpec::Literal("-".into()))
        .wait(false)
        .threaded(true),
    )
    .unwrap();
    root.add_item(Item::new("Quick", echo()).args(ArgSpec::Literal("quick".into())))
        .unwrap();

    let mut engine = MenuEngine::new(
        root,
        Arc::new(ActionRegistry::new()),
        Arc::new(LogSink::new()),
    );

    let start = Instant::now();
    engine.handle_line("1");
    assert!(start.elapsed() < Duration::from_millis(200));

    // The menu is immediately usable while the worker runs.
    engine.handle_line("2");
    assert_eq!(engine.sink().window(10)[0].text, "quick");

    // Completion shows up in the shared log once the worker is done.
    thread::sleep(Duration::from_millis(500));
    let texts: Vec<String> = engine
        .sink()
        .window(10)
        .into_iter()
        .map(|l| l.text)
        .collect();
    assert!(texts.contains(&"slow job finished".to_string()));
    assert!(texts.contains(&"Executed: Slow Job".to_string()));
}
