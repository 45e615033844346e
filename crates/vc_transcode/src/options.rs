//! Serializer configuration and per-call options.
//!
//! Effective settings are resolved per traversal with the precedence
//! property declaration > type modifiers > call options > serializer config.

use core::any::Any;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde::Deserialize;
use vc_object::Class;

use crate::error::RegistryError;
use crate::graph::ExposeGraph;
use crate::registry::{Registry, TypeHint};

/// Default key of the type discriminator in plain output.
pub const DEFAULT_TYPE_KEY: &str = "@type";

/// Default key of the object link in plain output.
pub const DEFAULT_LINK_KEY: &str = "@id";

// -----------------------------------------------------------------------------
// SerializerConfig

/// Serializer-wide defaults.
///
/// Missing fields take their default when deserialized, so a partial
/// document is a valid configuration:
///
/// ```
/// use vc_transcode::SerializerConfig;
///
/// let config: SerializerConfig = serde_json::from_str(r#"{
///     "use_reference_links": true,
///     "exclude_prefixes": ["_"]
/// }"#).unwrap();
///
/// assert!(config.use_reference_links);
/// assert_eq!(config.type_discriminator_key, "@type");
/// assert!(!config.default_visibility);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub type_discriminator_key: String,
    pub link_key: String,
    pub use_reference_links: bool,
    /// Visibility of properties no rule or graph decides on.
    pub default_visibility: bool,
    pub exclude_extraneous: bool,
    pub keep_initial_values: bool,
    pub exclude_prefixes: Vec<String>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            type_discriminator_key: String::from(DEFAULT_TYPE_KEY),
            link_key: String::from(DEFAULT_LINK_KEY),
            use_reference_links: false,
            default_visibility: false,
            exclude_extraneous: false,
            keep_initial_values: false,
            exclude_prefixes: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Target

/// Expected type of a deserialization root.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Class(&'static Class),
    /// A registered type name.
    Name(String),
    Hint(TypeHint),
}

impl From<&'static Class> for Target {
    #[inline]
    fn from(class: &'static Class) -> Self {
        Self::Class(class)
    }
}

impl From<TypeHint> for Target {
    #[inline]
    fn from(hint: TypeHint) -> Self {
        Self::Hint(hint)
    }
}

// -----------------------------------------------------------------------------
// Options

/// Options of a single serialize, deserialize or clone call.
///
/// Unset fields fall back to the [`SerializerConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    pub groups: Vec<String>,
    pub expose_graph: Option<ExposeGraph>,
    /// Added to the configured prefixes.
    pub exclude_prefixes: Vec<String>,
    pub default_visibility: Option<bool>,
    pub exclude_extraneous: Option<bool>,
    pub keep_initial_values: Option<bool>,
    /// Deepest visible depth, the root being `0`.
    pub max_depth: Option<usize>,
    pub use_reference_links: Option<bool>,
    pub type_discriminator_key: Option<String>,
    pub link_key: Option<String>,
    /// Exposes the whole graph regardless of rules.
    pub force_expose: bool,
    #[serde(skip)]
    pub target: Option<Target>,
    /// Opaque caller payload, see [`Context::ctx_data`](crate::Context::ctx_data).
    #[serde(skip)]
    pub ctx_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Options {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn expose_graph(mut self, graph: impl Into<ExposeGraph>) -> Self {
        self.expose_graph = Some(graph.into());
        self
    }

    pub fn exclude_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn default_visibility(mut self, value: bool) -> Self {
        self.default_visibility = Some(value);
        self
    }

    #[inline]
    pub fn exclude_extraneous(mut self, value: bool) -> Self {
        self.exclude_extraneous = Some(value);
        self
    }

    #[inline]
    pub fn keep_initial_values(mut self, value: bool) -> Self {
        self.keep_initial_values = Some(value);
        self
    }

    #[inline]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[inline]
    pub fn use_reference_links(mut self, value: bool) -> Self {
        self.use_reference_links = Some(value);
        self
    }

    #[inline]
    pub fn type_discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.type_discriminator_key = Some(key.into());
        self
    }

    #[inline]
    pub fn link_key(mut self, key: impl Into<String>) -> Self {
        self.link_key = Some(key.into());
        self
    }

    #[inline]
    pub fn force_expose(mut self, value: bool) -> Self {
        self.force_expose = value;
        self
    }

    #[inline]
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[inline]
    pub fn ctx_data<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.ctx_data = Some(Arc::new(data));
        self
    }
}

// -----------------------------------------------------------------------------
// ResolvedOptions

/// Config and call options folded into the values a traversal reads.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub groups: Vec<String>,
    pub expose_graph: Option<ExposeGraph>,
    pub exclude_prefixes: Vec<String>,
    pub default_visibility: bool,
    pub exclude_extraneous: bool,
    pub keep_initial_values: bool,
    pub max_depth: Option<usize>,
    pub use_reference_links: bool,
    pub type_key: String,
    pub link_key: String,
    pub force_expose: bool,
    pub root_hint: TypeHint,
    pub ctx_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResolvedOptions {
    /// # Errors
    ///
    /// [`RegistryError::UnknownTypeName`] if the target names no registered type.
    pub fn resolve(
        config: &SerializerConfig,
        options: &Options,
        registry: &Registry,
    ) -> Result<Self, RegistryError> {
        let root_hint = match &options.target {
            None => TypeHint::Auto,
            Some(Target::Class(class)) => TypeHint::Class(*class),
            Some(Target::Hint(hint)) => *hint,
            Some(Target::Name(name)) => registry
                .type_by_name(name)
                .map(TypeHint::Class)
                .ok_or_else(|| RegistryError::UnknownTypeName(name.clone()))?,
        };

        let mut exclude_prefixes = config.exclude_prefixes.clone();
        exclude_prefixes.extend(options.exclude_prefixes.iter().cloned());

        Ok(Self {
            groups: options.groups.clone(),
            expose_graph: options.expose_graph.clone(),
            exclude_prefixes,
            default_visibility: options.default_visibility.unwrap_or(config.default_visibility),
            exclude_extraneous: options.exclude_extraneous.unwrap_or(config.exclude_extraneous),
            keep_initial_values: options
                .keep_initial_values
                .unwrap_or(config.keep_initial_values),
            max_depth: options.max_depth,
            use_reference_links: options
                .use_reference_links
                .unwrap_or(config.use_reference_links),
            type_key: options
                .type_discriminator_key
                .clone()
                .unwrap_or_else(|| config.type_discriminator_key.clone()),
            link_key: options
                .link_key
                .clone()
                .unwrap_or_else(|| config.link_key.clone()),
            force_expose: options.force_expose,
            root_hint,
            ctx_data: options.ctx_data.clone(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
