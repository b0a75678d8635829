use clap::Parser;
use log::info;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use qmenu::core::engine::MenuEngine;
use qmenu::core::log_sink::LogSink;
use qmenu::core::menu::Submenu;
use qmenu::core::{actions, config};
use qmenu::tui;

#[derive(Parser)]
#[command(name = "qmenu", about = "Nested terminal menu with threaded actions")]
struct Args {
    /// Menu definition JSON file (defaults to the built-in demo menu)
    #[arg(short, long)]
    menu: Option<PathBuf>,

    /// Number of log lines visible in the log panel
    #[arg(long)]
    log_window: Option<usize>,

    /// Diagnostic log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = config::resolve(&file_config, args.menu, args.log_window, args.log_file);

    // File logger; the terminal itself belongs to the TUI.
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }
    info!("qmenu starting up");

    // Construction failures abort startup; no partial tree is left navigable.
    let root = match &config.menu {
        Some(path) => match load_menu(path) {
            Ok(root) => root,
            Err(message) => {
                eprintln!("{message}");
                return ExitCode::FAILURE;
            }
        },
        None => actions::demo_menu(),
    };

    let registry = Arc::new(actions::default_registry());
    let sink = Arc::new(LogSink::new());
    let engine = MenuEngine::new(root, registry, sink);

    match tui::run(engine, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_menu(path: &Path) -> Result<Submenu, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Submenu::from_json(&text).map_err(|e| format!("invalid menu {}: {e}", path.display()))
}
