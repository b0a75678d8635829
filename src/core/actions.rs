//! # Built-in Actions
//!
//! Demo actions shipped with the binary, the default registry that exposes
//! them under dotted paths, and the demo menu used when no menu file is
//! given on the command line.

use chrono::Local;
use std::thread;
use std::time::Duration;

use crate::core::log_sink::LogSink;
use crate::core::menu::Submenu;
use crate::core::registry::ActionRegistry;

/// Echo the argument line into the log.
pub fn echo(args: &str, sink: &LogSink) -> Result<(), String> {
    sink.append(args.to_string());
    Ok(())
}

/// Log the current wall-clock time.
pub fn clock(_args: &str, sink: &LogSink) -> Result<(), String> {
    sink.append(Local::now().format("%H:%M:%S").to_string());
    Ok(())
}

/// Sleep for the given number of milliseconds, then log. Run it threaded to
/// see the menu stay responsive while it works.
pub fn sleep_ms(args: &str, sink: &LogSink) -> Result<(), String> {
    let ms: u64 = args
        .trim()
        .parse()
        .map_err(|_| format!("not a duration in ms: {args:?}"))?;
    thread::sleep(Duration::from_millis(ms));
    sink.append(format!("slept {ms} ms"));
    Ok(())
}

/// Count from 1 to the given number, logging each step.
pub fn count(args: &str, sink: &LogSink) -> Result<(), String> {
    let to: u32 = args
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {args:?}"))?;
    for n in 1..=to {
        sink.append(n.to_string());
        thread::sleep(Duration::from_millis(100));
    }
    Ok(())
}

/// Registry pre-loaded with the built-in demo actions.
pub fn default_registry() -> ActionRegistry {
    let registry = ActionRegistry::new();
    registry.register_fn("demo.echo", echo);
    registry.register_fn("demo.clock", clock);
    registry.register_fn("demo.sleep", sleep_ms);
    registry.register_fn("demo.count", count);
    registry
}

/// The built-in demo tree, defined in the same JSON form a menu file uses.
pub fn demo_menu() -> Submenu {
    const DEMO: &str = r#"{
        "name": "Main Menu",
        "items": [
            { "type": "item", "name": "Say Hello", "action": "demo.echo", "args": "hi" },
            { "type": "submenu", "name": "Utilities", "items": [
                { "type": "item", "name": "Show Time", "action": "demo.clock", "args": "now" },
                { "type": "item", "name": "Count to Ten", "action": "demo.count", "args": "10",
                  "wait": false, "threaded": true },
                { "type": "item", "name": "Background Sleep", "action": "demo.sleep",
                  "wait": false, "threaded": true }
            ]},
            { "type": "item", "name": "Echo Input", "action": "demo.echo" }
        ]
    }"#;
    Submenu::from_json(DEMO).expect("built-in demo menu is well formed")
}
