//! Exposition graphs: caller supplied visibility override trees.
//!
//! A graph is navigated one level per property. `true`/`false` and nodes
//! give a decisive answer for their level; level counts, `"*"` and `"**"`
//! only bound how deep the declared rules may expose.
//!
//! | Graph       | This level            | Child level          |
//! |-------------|-----------------------|----------------------|
//! | `true`      | visible               | `false`              |
//! | `false`     | hidden                | `false`              |
//! | `n > 0`     | rules decide          | `n - 1`              |
//! | `n <= 0`    | hidden                | `n - 1`              |
//! | `"*"`       | rules decide          | `1`                  |
//! | `"**"`      | rules decide          | `"**"`               |
//! | node        | visible               | child by key, else `$default`, else `false` |

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// ExposeGraph

/// One level of an exposition graph.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_transcode::graph::{ExposeGraph, GraphDecision};
///
/// let graph = ExposeGraph::from_json(&json!({
///     "$default": true,
///     "secret": false,
///     "books": { "name": false },
/// })).unwrap();
///
/// assert_eq!(graph.decide(), Some(GraphDecision { expose: true, force: false }));
/// assert_eq!(graph.child("secret"), ExposeGraph::Flag(false));
/// assert_eq!(graph.child("title"), ExposeGraph::Levels(1));
/// assert_eq!(graph.child("books").child("name"), ExposeGraph::Flag(false));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonValue")]
pub enum ExposeGraph {
    Flag(bool),
    Levels(i64),
    /// `"*"`: this level and one more.
    Shallow,
    /// `"**"`: everything below.
    Deep,
    Node(Arc<GraphNode>),
}

/// Decisive graph answer for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphDecision {
    pub expose: bool,
    /// Expose the whole subtree.
    pub force: bool,
}

impl ExposeGraph {
    /// Decisive visibility of the current level, `None` if rules decide.
    pub fn decide(&self) -> Option<GraphDecision> {
        let expose = match self {
            Self::Flag(flag) => *flag,
            Self::Levels(n) if *n > 0 => return None,
            Self::Levels(_) => false,
            Self::Shallow | Self::Deep => return None,
            Self::Node(node) => {
                return Some(GraphDecision {
                    expose: true,
                    force: node.force_expose,
                });
            }
        };
        Some(GraphDecision {
            expose,
            force: false,
        })
    }

    /// Graph of the property `key` one level down.
    pub fn child(&self, key: &str) -> ExposeGraph {
        match self {
            Self::Flag(_) => Self::Flag(false),
            Self::Levels(n) => Self::Levels(n.saturating_sub(1)),
            Self::Shallow => Self::Levels(1),
            Self::Deep => Self::Deep,
            Self::Node(node) => {
                if let Some(child) = node.children.get(key) {
                    child.clone()
                } else if let Some(default) = &node.default {
                    default.as_default()
                } else {
                    Self::Flag(false)
                }
            }
        }
    }

    /// Graph applied to keys reached through `$default`.
    fn as_default(&self) -> ExposeGraph {
        match self {
            Self::Flag(true) => Self::Levels(1),
            Self::Flag(false) => Self::Flag(false),
            Self::Node(node) => node.expose.clone().unwrap_or(Self::Flag(false)),
            other => other.clone(),
        }
    }

    /// Parses the JSON form: booleans, integers, `"*"`, `"**"` and objects
    /// with per-key children plus the `$default`, `$expose` and
    /// `$forceExpose` keys.
    pub fn from_json(json: &JsonValue) -> Result<Self, GraphParseError> {
        match json {
            JsonValue::Bool(flag) => Ok(Self::Flag(*flag)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Self::Levels)
                .ok_or_else(|| GraphParseError(format!("level count `{n}` is not an integer"))),
            JsonValue::String(s) if s == "*" => Ok(Self::Shallow),
            JsonValue::String(s) if s == "**" => Ok(Self::Deep),
            JsonValue::Object(map) => {
                let mut node = GraphNode::new();
                for (key, value) in map {
                    match key.as_str() {
                        "$default" => node.default = Some(Self::from_json(value)?),
                        "$expose" => node.expose = Some(Self::from_json(value)?),
                        "$forceExpose" => {
                            node.force_expose = value.as_bool().ok_or_else(|| {
                                GraphParseError(String::from("`$forceExpose` must be a boolean"))
                            })?;
                        }
                        _ => {
                            node.children.insert(key.clone(), Self::from_json(value)?);
                        }
                    }
                }
                Ok(Self::Node(Arc::new(node)))
            }
            other => Err(GraphParseError(format!("unexpected graph value `{other}`"))),
        }
    }
}

impl From<bool> for ExposeGraph {
    #[inline]
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<i64> for ExposeGraph {
    #[inline]
    fn from(levels: i64) -> Self {
        Self::Levels(levels)
    }
}

impl From<GraphNode> for ExposeGraph {
    #[inline]
    fn from(node: GraphNode) -> Self {
        Self::Node(Arc::new(node))
    }
}

impl TryFrom<JsonValue> for ExposeGraph {
    type Error = GraphParseError;

    #[inline]
    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json(&json)
    }
}

// -----------------------------------------------------------------------------
// GraphNode

/// A graph level with per-key children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphNode {
    children: HashMap<String, ExposeGraph>,
    default: Option<ExposeGraph>,
    expose: Option<ExposeGraph>,
    force_expose: bool,
}

impl GraphNode {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn child(mut self, key: impl Into<String>, graph: impl Into<ExposeGraph>) -> Self {
        self.children.insert(key.into(), graph.into());
        self
    }

    /// Graph for keys without an explicit child (`$default`).
    #[inline]
    pub fn default_child(mut self, graph: impl Into<ExposeGraph>) -> Self {
        self.default = Some(graph.into());
        self
    }

    /// Graph used when this node is reached through `$default` (`$expose`).
    #[inline]
    pub fn expose(mut self, graph: impl Into<ExposeGraph>) -> Self {
        self.expose = Some(graph.into());
        self
    }

    /// Force-expose the subtree of this node (`$forceExpose`).
    #[inline]
    pub fn force(mut self) -> Self {
        self.force_expose = true;
        self
    }
}

// -----------------------------------------------------------------------------
// GraphParseError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid exposition graph: {0}")]
pub struct GraphParseError(String);

// -----------------------------------------------------------------------------
// Tests
