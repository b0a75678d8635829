//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the menu and
//! log panels, and feeds completed input lines to the core engine.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! never touches cursor positioning, colors, or screen clearing.
//!
//! ## Redraw Strategy
//!
//! The loop polls with a short timeout and redraws every tick, so log
//! entries appended by background action workers appear without any user
//! input. While a `wait = true` invocation runs, the loop is parked inside
//! `handle_line`; keys pressed in the meantime stay queued in crossterm and
//! are consumed as ordinary input afterwards.

mod event;
mod ui;

use log::{debug, info};
use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::engine::{Effect, MenuEngine};
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    /// The line being edited.
    pub input: String,
    /// Log panel window size.
    pub log_window: usize,
}

pub fn run(mut engine: MenuEngine, config: &ResolvedConfig) -> std::io::Result<()> {
    let mut tui = TuiState {
        input: String::new(),
        log_window: config.log_window,
    };

    let mut terminal = ratatui::init();
    info!("menu session started");

    loop {
        terminal.draw(|f| ui::draw_ui(f, &engine, &tui))?;

        let Some(event) = poll_event_timeout(Duration::from_millis(100)) else {
            continue;
        };
        match event {
            TuiEvent::InputChar(c) => tui.input.push(c),
            TuiEvent::Backspace => {
                tui.input.pop();
            }
            TuiEvent::Submit => {
                let line = std::mem::take(&mut tui.input);
                debug!("input line: {line:?}");
                if engine.handle_line(&line) == Effect::Quit {
                    break;
                }
            }
            TuiEvent::ForceQuit => {
                info!("force quit");
                break;
            }
            TuiEvent::Resize => {}
        }
    }

    ratatui::restore();
    Ok(())
}
