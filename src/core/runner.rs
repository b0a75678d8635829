//! # Action Runner
//!
//! Executes resolved actions per an item's `wait`/`threaded` flags and
//! reports outcomes to the shared log sink. Failures are contained here:
//! an action that returns `Err` or panics produces one error log entry
//! tagged with the item name and nothing else; nothing propagates to the
//! engine.
//!
//! Threading model: `threaded = false` runs inline on the caller's thread
//! and always runs to completion before returning. `threaded = true`
//! spawns one worker per invocation (no pool); `wait = true` joins it,
//! `wait = false` detaches it and completion is observed only through the
//! log sink. Detached workers cannot be cancelled.

use log::{debug, warn};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;

use crate::core::log_sink::LogSink;
use crate::core::registry::ActionFn;

pub struct ActionRunner {
    sink: Arc<LogSink>,
}

impl ActionRunner {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self { sink }
    }

    /// Invoke `action` on behalf of the item named `item_name`.
    pub fn run(&self, item_name: &str, action: ActionFn, args: String, wait: bool, threaded: bool) {
        if !threaded {
            invoke(item_name, &action, &args, &self.sink);
            return;
        }

        debug!("dispatching worker for '{item_name}' (wait={wait})");
        let sink = self.sink.clone();
        let name = item_name.to_string();
        let handle = thread::Builder::new()
            .name(format!("action-{item_name}"))
            .spawn(move || invoke(&name, &action, &args, &sink));

        match handle {
            Ok(handle) if wait => {
                // invoke() contains panics, so a join error means the
                // containment itself failed. Record it and keep going.
                if handle.join().is_err() {
                    warn!("worker for '{item_name}' terminated abnormally");
                    self.sink
                        .append(format!("Error: {item_name}: worker terminated abnormally"));
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("failed to spawn worker for '{item_name}': {e}");
                self.sink
                    .append(format!("Error: {item_name}: could not start worker ({e})"));
            }
        }
    }
}

/// Run one invocation, containing both `Err` returns and panics. Exactly
/// one log entry is appended per invocation.
fn invoke(item_name: &str, action: &ActionFn, args: &str, sink: &LogSink) {
    match catch_unwind(AssertUnwindSafe(|| (**action)(args, sink))) {
        Ok(Ok(())) => {
            debug!("action '{item_name}' completed");
            sink.append(format!("Executed: {item_name}"));
        }
        Ok(Err(msg)) => {
            warn!("action '{item_name}' failed: {msg}");
            sink.append(format!("Error: {item_name}: {msg}"));
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!("action '{item_name}' panicked: {msg}");
            sink.append(format!("Error: {item_name}: {msg}"));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("panic")
    }
}
