use core::fmt;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::Value;

use crate::context::Context;

// -----------------------------------------------------------------------------
// AutoGroup

/// Groups activated for a branch when the predicate accepts the value.
///
/// The predicate sees the current node value and the traversal context,
/// which exposes the caller payload through [`Context::ctx_data`].
#[derive(Clone)]
pub struct AutoGroup {
    groups: Vec<String>,
    predicate: Arc<dyn Fn(&Value, &Context<'_>) -> bool + Send + Sync>,
}

impl AutoGroup {
    pub fn new<I, S>(
        groups: I,
        predicate: impl Fn(&Value, &Context<'_>) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            predicate: Arc::new(predicate),
        }
    }

    #[inline]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[inline]
    pub fn test(&self, value: &Value, ctx: &Context<'_>) -> bool {
        (self.predicate)(value, ctx)
    }
}

impl fmt::Debug for AutoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoGroup")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeModifiers

/// Per-type overrides of call options.
///
/// `None` defers to the call options, and those to the serializer config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeModifiers {
    pub exclude_prefixes: Vec<String>,
    pub exclude_extraneous: Option<bool>,
    pub default_visibility: Option<bool>,
    pub keep_initial_values: Option<bool>,
}

impl TypeModifiers {
    #[inline]
    pub fn new() -> Self {
        Self::default()
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
    pub fn exclude_extraneous(mut self, value: bool) -> Self {
        self.exclude_extraneous = Some(value);
        self
    }

    #[inline]
    pub fn default_visibility(mut self, value: bool) -> Self {
        self.default_visibility = Some(value);
        self
    }

    #[inline]
    pub fn keep_initial_values(mut self, value: bool) -> Self {
        self.keep_initial_values = Some(value);
        self
    }
}

// -----------------------------------------------------------------------------
// TypeDefinition

/// Arguments of [`Registry::register_type`](super::Registry::register_type).
///
/// Without a name, one is derived from the nearest named ancestor.
#[derive(Debug, Clone, Default)]
pub struct TypeDefinition {
    pub name: Option<String>,
    pub id_property: Option<String>,
    pub modifiers: Option<TypeModifiers>,
}

impl TypeDefinition {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn id(mut self, key: impl Into<String>) -> Self {
        self.id_property = Some(key.into());
        self
    }

    #[inline]
    pub fn modifiers(mut self, modifiers: TypeModifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Registered metadata of a class.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    pub(crate) name: Option<String>,
    pub(crate) id_property: Option<String>,
    pub(crate) auto_groups: Vec<AutoGroup>,
    pub(crate) modifiers: TypeModifiers,
}

impl TypeDescriptor {
    /// Wire discriminator, unique in the registry.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn id_property(&self) -> Option<&str> {
        self.id_property.as_deref()
    }

    #[inline]
    pub fn auto_groups(&self) -> &[AutoGroup] {
        &self.auto_groups
    }

    #[inline]
    pub fn modifiers(&self) -> &TypeModifiers {
        &self.modifiers
    }

    /// Copy used to seed the descriptor of a subclass.
    pub(crate) fn inherit(&self) -> Self {
        Self {
            name: None,
            ..self.clone()
        }
    }
}
