//! # Action Registry
//!
//! Maps dotted-path action references (`"demo.echo"`) to invocable actions.
//! Items loaded from a menu file carry only the path; resolution happens
//! lazily at invocation time and the result is cached, so resolving the
//! same path twice always yields the same callable.
//!
//! Paths not registered directly fall through to a pluggable
//! [`ActionLookup`], the seam where an embedding application can expose its
//! own function namespace.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::core::log_sink::LogSink;

/// The invocable unit bound to a menu item.
///
/// Actions receive the argument line configured for (or prompted from) the
/// user and the shared log sink for output. Returning `Err` marks the
/// invocation as failed; the runner converts it to a log entry.
pub type ActionFn = Arc<dyn Fn(&str, &LogSink) -> Result<(), String> + Send + Sync>;

/// Wrap a closure as an [`ActionFn`].
pub fn action<F>(f: F) -> ActionFn
where
    F: Fn(&str, &LogSink) -> Result<(), String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Reference to an action: bound directly, or by dotted path resolved
/// through the registry at invocation time.
#[derive(Clone)]
pub enum ActionRef {
    Direct(ActionFn),
    Named(String),
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionRef::Direct(_) => write!(f, "Direct(..)"),
            ActionRef::Named(path) => write!(f, "Named({path:?})"),
        }
    }
}

/// Resolution failures. Fatal to the specific invocation only; the menu
/// keeps running and the failure is reported through the log sink.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No value exists at the referenced path.
    ActionNotFound(String),
    /// The path resolved to a value that is not an action.
    ActionNotCallable(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ActionNotFound(path) => write!(f, "no action at {path:?}"),
            RegistryError::ActionNotCallable(path) => {
                write!(f, "value at {path:?} is not callable")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Pluggable lookup for dotted paths with no direct registration.
///
/// `lookup` returns whatever value lives at `path`; the registry then checks
/// that the value actually is an [`ActionFn`] and caches it when it is. A
/// value of any other concrete type resolves to `ActionNotCallable`, so
/// implementations must store invocable values as `ActionFn` (via
/// [`action`]), not as a bare closure type.
pub trait ActionLookup: Send + Sync {
    fn lookup(&self, path: &str) -> Option<Box<dyn Any>>;
}

/// Process-wide action registry: created at startup, torn down at exit.
/// Holds direct registrations and caches lookup resolutions for its
/// lifetime; there is no reset operation.
pub struct ActionRegistry {
    entries: Mutex<HashMap<String, ActionFn>>,
    lookup: Option<Box<dyn ActionLookup>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            lookup: None,
        }
    }

    pub fn with_lookup(lookup: impl ActionLookup + 'static) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            lookup: Some(Box::new(lookup)),
        }
    }

    /// Add a direct path-to-action mapping.
    pub fn register(&self, path: impl Into<String>, action: ActionFn) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), action);
    }

    /// Convenience wrapper around [`register`](Self::register) for closures
    /// and fn items.
    pub fn register_fn<F>(&self, path: impl Into<String>, f: F)
    where
        F: Fn(&str, &LogSink) -> Result<(), String> + Send + Sync + 'static,
    {
        self.register(path, Arc::new(f));
    }

    /// Resolve a reference to its callable.
    ///
    /// Direct references return their binding as-is. Named references hit
    /// the cache first, then the pluggable lookup; successful lookups are
    /// cached so later resolutions of the same path return the same
    /// callable.
    pub fn resolve(&self, action: &ActionRef) -> Result<ActionFn, RegistryError> {
        let path = match action {
            ActionRef::Direct(f) => return Ok(f.clone()),
            ActionRef::Named(path) => path,
        };

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(f) = entries.get(path) {
            return Ok(f.clone());
        }

        let value = self
            .lookup
            .as_ref()
            .and_then(|l| l.lookup(path))
            .ok_or_else(|| RegistryError::ActionNotFound(path.clone()))?;
        let f = value
            .downcast::<ActionFn>()
            .map_err(|_| RegistryError::ActionNotCallable(path.clone()))?;
        entries.insert(path.clone(), (*f).clone());
        Ok(*f)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
