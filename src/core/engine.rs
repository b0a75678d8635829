//! # Menu Engine
//!
//! The navigation state machine. Holds the tree, a path of child indices
//! from the root to the displayed submenu, and the current input state:
//!
//! ```text
//! Browsing ──select submenu──▶ Browsing (path pushed)
//! Browsing ──select "0"──────▶ Browsing (path popped) | Exited (at root)
//! Browsing ──select item─────▶ AwaitingArgs (prompt sentinel) | invoke
//! AwaitingArgs ──line────────▶ invoke, back to Browsing
//! ```
//!
//! The engine consumes one line of input per request (a 1-based index or an
//! exact child name) and runs on a single thread; while a `wait = true`
//! invocation is in flight that thread is parked inside the call, so no
//! navigation input can race the path. `0` is always back/exit and wins
//! over a child named "0".
//!
//! All per-invocation failures (resolution errors, action errors) become
//! log entries; only construction errors are allowed to stop the program.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::core::log_sink::LogSink;
use crate::core::menu::{ArgSpec, MenuNode, Submenu};
use crate::core::registry::ActionRegistry;
use crate::core::runner::ActionRunner;

/// What the engine is doing between input lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Displaying a submenu, waiting for a selection.
    Browsing,
    /// Waiting for the argument line for the child item at this index.
    AwaitingArgs { child: usize },
    /// Terminal state; further input is discarded.
    Exited,
}

/// Outcome of one input line, for the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Continue,
    Quit,
}

/// Snapshot handed to the renderer each tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    /// Name of the displayed submenu.
    pub title: String,
    /// Ordered child labels.
    pub entries: Vec<MenuEntry>,
    /// Parent menu name; `None` means the back entry is an exit.
    pub parent: Option<String>,
    /// Argument prompt, set while awaiting an argument line.
    pub prompt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: String,
    pub submenu: bool,
}

pub struct MenuEngine {
    root: Submenu,
    path: Vec<usize>,
    state: EngineState,
    registry: Arc<ActionRegistry>,
    runner: ActionRunner,
    sink: Arc<LogSink>,
}

impl MenuEngine {
    pub fn new(root: Submenu, registry: Arc<ActionRegistry>, sink: Arc<LogSink>) -> Self {
        Self {
            root,
            path: Vec::new(),
            state: EngineState::Browsing,
            registry,
            runner: ActionRunner::new(sink.clone()),
            sink,
        }
    }

    /// The submenu addressed by the path (root when the path is empty).
    pub fn current(&self) -> &Submenu {
        self.submenu_at(self.path.len())
    }

    pub fn path_depth(&self) -> usize {
        self.path.len()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }

    /// Build the render snapshot for the current frame.
    pub fn view(&self) -> MenuView {
        let current = self.current();
        let entries = current
            .children()
            .iter()
            .map(|child| MenuEntry {
                name: child.name().to_string(),
                submenu: matches!(child, MenuNode::Submenu(_)),
            })
            .collect();
        let parent = (!self.path.is_empty())
            .then(|| self.submenu_at(self.path.len() - 1).name.clone());
        let prompt = match self.state {
            EngineState::AwaitingArgs { child } => current
                .children()
                .get(child)
                .map(|item| format!("Enter arguments for {}", item.name())),
            _ => None,
        };
        MenuView {
            title: current.name.clone(),
            entries,
            parent,
            prompt,
        }
    }

    /// Consume one line of input.
    ///
    /// Navigation is only honored while browsing; argument input only while
    /// awaiting it; anything after exit is discarded.
    pub fn handle_line(&mut self, line: &str) -> Effect {
        let line = line.trim();
        match self.state.clone() {
            EngineState::Exited => Effect::Quit,
            EngineState::AwaitingArgs { child } => {
                self.state = EngineState::Browsing;
                self.invoke(child, line.to_string());
                Effect::Continue
            }
            EngineState::Browsing => self.select(line),
        }
    }

    fn select(&mut self, line: &str) -> Effect {
        let child_count = self.current().children().len();
        let index = if let Ok(number) = line.parse::<usize>() {
            if number == 0 {
                return self.leave();
            }
            if number > child_count {
                debug!("selection out of range: {number}");
                self.sink.append("Invalid selection.");
                return Effect::Continue;
            }
            number - 1
        } else {
            // Exact name match; sibling names are unique by construction.
            match self
                .current()
                .children()
                .iter()
                .position(|c| c.name() == line)
            {
                Some(index) => index,
                None => {
                    debug!("unrecognized input: {line:?}");
                    self.sink.append("Invalid input.");
                    return Effect::Continue;
                }
            }
        };

        enum Selected {
            Submenu,
            PromptItem,
            LiteralItem(String),
        }
        let selected = match &self.current().children()[index] {
            MenuNode::Submenu(_) => Selected::Submenu,
            MenuNode::Item(item) => match &item.args {
                ArgSpec::Prompt => Selected::PromptItem,
                ArgSpec::Literal(value) => Selected::LiteralItem(value.clone()),
            },
        };
        match selected {
            Selected::Submenu => {
                self.path.push(index);
                debug!("entered submenu '{}'", self.current().name);
            }
            Selected::PromptItem => {
                self.state = EngineState::AwaitingArgs { child: index };
            }
            Selected::LiteralItem(args) => self.invoke(index, args),
        }
        Effect::Continue
    }

    /// `0`: pop to the parent, or exit when already at the root.
    fn leave(&mut self) -> Effect {
        if self.path.pop().is_none() {
            info!("exiting menu");
            self.sink.append("Exited menu.");
            self.state = EngineState::Exited;
            return Effect::Quit;
        }
        Effect::Continue
    }

    fn invoke(&mut self, child: usize, args: String) {
        let item = match self.current().children().get(child) {
            Some(MenuNode::Item(item)) => item.clone(),
            _ => return,
        };
        debug!(
            "invoking '{}' (wait={}, threaded={})",
            item.name, item.wait, item.threaded
        );
        let action = match self.registry.resolve(&item.action) {
            Ok(action) => action,
            Err(e) => {
                warn!("cannot resolve action for '{}': {e}", item.name);
                self.sink.append(format!("Error: {}: {e}", item.name));
                return;
            }
        };
        self.runner
            .run(&item.name, action, args, item.wait, item.threaded);
    }

    fn submenu_at(&self, depth: usize) -> &Submenu {
        let mut node = &self.root;
        for &index in &self.path[..depth] {
            if let Some(MenuNode::Submenu(sub)) = node.children().get(index) {
                node = sub;
            }
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::menu::Item;
    use crate::core::registry::{ActionRef, action};
    use std::thread;
    use std::time::{Duration, Instant};

    fn engine_with(root: Submenu) -> MenuEngine {
        MenuEngine::new(
            root,
            Arc::new(ActionRegistry::new()),
            Arc::new(LogSink::new()),
        )
    }

    fn sample_tree() -> Submenu {
        let mut root = Submenu::new("Main Menu");
        root.add_item(
            Item::new(
                "Say Hello",
                ActionRef::Direct(action(|args, sink: &LogSink| {
                    sink.append(args.to_string());
                    Ok(())
                })),
            )
            .args(ArgSpec::Literal("hi".into())),
        )
        .unwrap();
        let utilities = root.add_submenu("Utilities").unwrap();
        utilities
            .add_item(
                Item::new(
                    "Show Time",
                    ActionRef::Direct(action(|_, sink: &LogSink| {
                        sink.append("12:00:00");
                        Ok(())
                    })),
                )
                .args(ArgSpec::Literal("now".into())),
            )
            .unwrap();
        root
    }

    #[test]
    fn test_initial_state_displays_root_with_empty_path() {
        let engine = engine_with(sample_tree());
        assert_eq!(engine.path_depth(), 0);
        assert_eq!(engine.current().name, "Main Menu");
        assert_eq!(*engine.state(), EngineState::Browsing);

        let view = engine.view();
        assert_eq!(view.title, "Main Menu");
        assert_eq!(view.parent, None);
        assert_eq!(view.prompt, None);
        assert_eq!(view.entries.len(), 2);
        assert!(!view.entries[0].submenu);
        assert!(view.entries[1].submenu);
    }

    #[test]
    fn test_navigation_is_a_reversible_stack() {
        let mut engine = engine_with(sample_tree());
        assert_eq!(engine.handle_line("2"), Effect::Continue);
        assert_eq!(engine.path_depth(), 1);
        assert_eq!(engine.current().name, "Utilities");
        assert_eq!(engine.view().parent, Some("Main Menu".into()));

        assert_eq!(engine.handle_line("0"), Effect::Continue);
        assert_eq!(engine.path_depth(), 0);
        assert_eq!(engine.current().name, "Main Menu");
        assert_eq!(engine.view().entries.len(), 2);
    }

    #[test]
    fn test_selection_by_name() {
        let mut engine = engine_with(sample_tree());
        engine.handle_line("Utilities");
        assert_eq!(engine.current().name, "Utilities");
    }

    #[test]
    fn test_exit_from_root_is_terminal() {
        let mut engine = engine_with(sample_tree());
        assert_eq!(engine.handle_line("0"), Effect::Quit);
        assert_eq!(*engine.state(), EngineState::Exited);
        assert_eq!(engine.sink().window(1)[0].text, "Exited menu.");
        // Input after exit is discarded.
        assert_eq!(engine.handle_line("1"), Effect::Quit);
        assert_eq!(engine.sink().len(), 1);
    }

    #[test]
    fn test_invalid_selections_are_logged_and_ignored() {
        let mut engine = engine_with(sample_tree());
        engine.handle_line("9");
        engine.handle_line("what");
        let window = engine.sink().window(2);
        assert_eq!(window[0].text, "Invalid selection.");
        assert_eq!(window[1].text, "Invalid input.");
        assert_eq!(engine.path_depth(), 0);
    }

    #[test]
    fn test_literal_item_invokes_synchronously() {
        let mut engine = engine_with(sample_tree());
        engine.handle_line("1");
        // Output and the completion entry are visible before the next render.
        let window = engine.sink().window(2);
        assert_eq!(window[0].text, "hi");
        assert_eq!(window[1].text, "Executed: Say Hello");
        assert_eq!(*engine.state(), EngineState::Browsing);
    }

    #[test]
    fn test_prompt_item_awaits_one_argument_line() {
        let mut root = Submenu::new("Main Menu");
        root.add_item(
            Item::new(
                "Echo Input",
                ActionRef::Direct(action(|args, sink: &LogSink| {
                    sink.append(format!("got {args}"));
                    Ok(())
                })),
            )
            .args(ArgSpec::Prompt),
        )
        .unwrap();
        let mut engine = engine_with(root);

        engine.handle_line("1");
        assert_eq!(*engine.state(), EngineState::AwaitingArgs { child: 0 });
        assert_eq!(
            engine.view().prompt,
            Some("Enter arguments for Echo Input".into())
        );

        engine.handle_line("apples");
        assert_eq!(*engine.state(), EngineState::Browsing);
        assert_eq!(engine.sink().window(2)[0].text, "got apples");
    }

    #[test]
    fn test_wait_item_blocks_the_engine() {
        let mut root = Submenu::new("Main Menu");
        root.add_item(
            Item::new(
                "Nap",
                ActionRef::Direct(action(|_, _: &LogSink| {
                    thread::sleep(Duration::from_millis(100));
                    Ok(())
                })),
            )
            .args(ArgSpec::Literal("-".into())),
        )
        .unwrap();
        let mut engine = engine_with(root);

        let start = Instant::now();
        engine.handle_line("1");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_threaded_no_wait_item_returns_immediately() {
        let mut root = Submenu::new("Main Menu");
        root.add_item(
            Item::new(
                "Background Nap",
                ActionRef::Direct(action(|_, _: &LogSink| {
                    thread::sleep(Duration::from_secs(1));
                    Ok(())
                })),
            )
            .args(ArgSpec::Literal("-".into()))
            .wait(false)
            .threaded(true),
        )
        .unwrap();
        let mut engine = engine_with(root);

        let start = Instant::now();
        engine.handle_line("1");
        assert!(start.elapsed() < Duration::from_millis(250));
        // The engine is immediately navigable again.
        assert_eq!(*engine.state(), EngineState::Browsing);
        assert_eq!(engine.handle_line("0"), Effect::Quit);
    }

    #[test]
    fn test_failing_action_logs_once_and_leaves_path_unchanged() {
        let mut root = Submenu::new("Main Menu");
        let tools = root.add_submenu("Tools").unwrap();
        tools
            .add_item(
                Item::new(
                    "Doomed",
                    ActionRef::Direct(action(|_, _: &LogSink| Err(String::from("boom")))),
                )
                .args(ArgSpec::Literal("-".into())),
            )
            .unwrap();
        let mut engine = engine_with(root);

        engine.handle_line("1");
        let before = engine.sink().len();
        engine.handle_line("1");
        assert_eq!(engine.sink().len(), before + 1);
        assert!(engine.sink().window(1)[0].text.contains("Doomed"));
        assert_eq!(engine.path_depth(), 1);
        assert_eq!(engine.current().name, "Tools");
    }

    #[test]
    fn test_unresolvable_action_is_logged_and_menu_continues() {
        let mut root = Submenu::new("Main Menu");
        root.add_item(Item::new("Ghost", ActionRef::Named("demo.missing".into())))
            .unwrap();
        let mut engine = engine_with(root);

        // Named item with the default prompt-less literal args.
        engine.handle_line("Ghost");
        assert_eq!(engine.sink().len(), 1);
        let entry = &engine.sink().window(1)[0].text;
        assert!(entry.contains("Ghost"));
        assert!(entry.contains("demo.missing"));
        assert_eq!(*engine.state(), EngineState::Browsing);
    }
}
