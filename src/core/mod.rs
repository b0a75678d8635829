//! # Core Menu Logic
//!
//! This module contains qmenu's business logic. It knows nothing about any
//! specific terminal technology.
//!
//! ```text
//!                 ┌────────────────────────────────┐
//!                 │            CORE                │
//!                 │  (this module)                 │
//!                 │                                │
//!                 │  • menu     (tree)             │
//!                 │  • engine   (state machine)    │
//!                 │  • registry (action lookup)    │
//!                 │  • runner   (worker dispatch)  │
//!                 │  • log_sink (shared log)       │
//!                 │                                │
//!                 │  No terminal I/O.              │
//!                 └───────────────┬────────────────┘
//!                                 │
//!                                 ▼
//!                          ┌────────────┐
//!                          │    TUI     │
//!                          │  Adapter   │
//!                          │ (ratatui)  │
//!                          └────────────┘
//! ```
//!
//! The engine consumes one line of input at a time and exposes a
//! [`engine::MenuView`] snapshot per render tick; everything about cursors,
//! colors, and screen clearing belongs to the adapter.

pub mod actions;
pub mod config;
pub mod engine;
pub mod log_sink;
pub mod menu;
pub mod registry;
pub mod runner;
