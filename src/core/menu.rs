//! # Menu Tree
//!
//! The immutable menu hierarchy: a [`Submenu`] holds ordered children, each
//! either a nested submenu or an invocable [`Item`]. Insertion order is
//! display order. Sibling names must be unique because selection by name
//! would otherwise be ambiguous; collisions are rejected at construction.
//!
//! Trees are built once at startup, either programmatically or from a JSON
//! description ([`MenuDef`]), and never change while a session is running.
//! Item actions loaded from JSON stay [`ActionRef::Named`] and are resolved
//! through the registry at invocation time.

use serde::Deserialize;
use std::fmt;

use crate::core::registry::ActionRef;

/// How an item's arguments are obtained at invocation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgSpec {
    /// Ask the user for one line of input before invoking.
    Prompt,
    /// Pass this value as-is.
    Literal(String),
}

impl ArgSpec {
    /// JSON convention: a missing or empty `args` string means "prompt".
    fn from_field(args: Option<String>) -> Self {
        match args {
            Some(s) if !s.is_empty() => ArgSpec::Literal(s),
            _ => ArgSpec::Prompt,
        }
    }
}

/// Leaf node: a named menu entry bound to an action.
#[derive(Clone, Debug)]
pub struct Item {
    pub name: String,
    pub action: ActionRef,
    pub args: ArgSpec,
    /// Block the engine until the action completes before redrawing.
    pub wait: bool,
    /// Run the action on a background worker thread.
    pub threaded: bool,
}

impl Item {
    pub fn new(name: impl Into<String>, action: ActionRef) -> Self {
        Self {
            name: name.into(),
            action,
            args: ArgSpec::Literal(String::new()),
            wait: true,
            threaded: false,
        }
    }

    pub fn args(mut self, args: ArgSpec) -> Self {
        self.args = args;
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn threaded(mut self, threaded: bool) -> Self {
        self.threaded = threaded;
        self
    }
}

/// Interior node: ordered children, displayed as a navigable list.
#[derive(Clone, Debug)]
pub struct Submenu {
    pub name: String,
    children: Vec<MenuNode>,
}

/// One tree node, exactly one payload per node.
#[derive(Clone, Debug)]
pub enum MenuNode {
    Submenu(Submenu),
    Item(Item),
}

impl MenuNode {
    pub fn name(&self) -> &str {
        match self {
            MenuNode::Submenu(sub) => &sub.name,
            MenuNode::Item(item) => &item.name,
        }
    }
}

/// Construction-time failures. Fatal to startup; callers must not keep a
/// partially built tree around.
#[derive(Debug, PartialEq, Eq)]
pub enum TreeError {
    /// A sibling with this name already exists under the named parent.
    DuplicateName { parent: String, name: String },
    /// The description is missing required fields or uses an unknown type.
    Malformed(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::DuplicateName { parent, name } => {
                write!(f, "duplicate entry {name:?} in menu {parent:?}")
            }
            TreeError::Malformed(msg) => write!(f, "malformed menu description: {msg}"),
        }
    }
}

impl std::error::Error for TreeError {}

impl Submenu {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }

    /// Append an item, preserving insertion order.
    pub fn add_item(&mut self, item: Item) -> Result<(), TreeError> {
        self.check_sibling(&item.name)?;
        self.children.push(MenuNode::Item(item));
        Ok(())
    }

    /// Append an empty submenu and return it for population.
    pub fn add_submenu(&mut self, name: impl Into<String>) -> Result<&mut Submenu, TreeError> {
        let name = name.into();
        self.check_sibling(&name)?;
        self.children.push(MenuNode::Submenu(Submenu::new(name)));
        match self.children.last_mut() {
            Some(MenuNode::Submenu(sub)) => Ok(sub),
            _ => unreachable!("just pushed a submenu"),
        }
    }

    fn check_sibling(&self, name: &str) -> Result<(), TreeError> {
        if self.children.iter().any(|c| c.name() == name) {
            return Err(TreeError::DuplicateName {
                parent: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Build a tree from its JSON text form.
    pub fn from_json(text: &str) -> Result<Submenu, TreeError> {
        let def: MenuDef =
            serde_json::from_str(text).map_err(|e| TreeError::Malformed(e.to_string()))?;
        Submenu::from_def(def)
    }

    /// Build a tree from an already-deserialized description.
    pub fn from_def(def: MenuDef) -> Result<Submenu, TreeError> {
        let mut root = Submenu::new(def.name);
        for node in def.items {
            root.add_def(node)?;
        }
        Ok(root)
    }

    fn add_def(&mut self, node: NodeDef) -> Result<(), TreeError> {
        match node {
            NodeDef::Item {
                name,
                action,
                args,
                wait,
                threaded,
            } => self.add_item(Item {
                name,
                action: ActionRef::Named(action),
                args: ArgSpec::from_field(args),
                wait,
                threaded,
            }),
            NodeDef::Submenu { name, items } => {
                let sub = self.add_submenu(name)?;
                for child in items {
                    sub.add_def(child)?;
                }
                Ok(())
            }
        }
    }
}

/// External tree description, as produced from a menu JSON file.
#[derive(Debug, Deserialize)]
pub struct MenuDef {
    pub name: String,
    #[serde(default)]
    pub items: Vec<NodeDef>,
}

/// One node of the description; `type` selects the variant.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDef {
    Item {
        name: String,
        action: String,
        args: Option<String>,
        #[serde(default = "default_wait")]
        wait: bool,
        #[serde(default)]
        threaded: bool,
    },
    Submenu {
        name: String,
        items: Vec<NodeDef>,
    },
}

fn default_wait() -> bool {
    true
}
