use core::fmt;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::{Class, ObjectRef, Value};

use crate::context::Context;

// -----------------------------------------------------------------------------
// Access

/// Read/write capability of a property.
///
/// Write-only properties are never serialized, read-only properties are
/// never assigned during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Access {
    #[inline]
    pub const fn is_readable(self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    #[inline]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

// -----------------------------------------------------------------------------
// TypeHint

/// Declared shape of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeHint {
    /// Detect from the runtime value.
    #[default]
    Auto,
    /// A concrete class; subclasses of it are accepted.
    Class(&'static Class),
    /// A list whose items are of the class, or auto-detected.
    ArrayOf(Option<&'static Class>),
    /// A string-keyed map whose values are of the class, or auto-detected.
    MapOf(Option<&'static Class>),
}

impl TypeHint {
    /// Hint used for items of a list or values of a map.
    #[inline]
    pub const fn item(class: Option<&'static Class>) -> Self {
        match class {
            Some(class) => Self::Class(class),
            None => Self::Auto,
        }
    }
}

// -----------------------------------------------------------------------------
// VisibilityRule

/// A conditional expose or exclude declaration.
///
/// The positive part matches when all groups of `all` are active, or any
/// group of `any` is active. The negative part, if present, must hold as
/// well: `not_all` fails only when every listed group is active, `not_any`
/// fails as soon as one listed group is active. A rule without conditions
/// always matches.
///
/// # Examples
///
/// ```
/// use vc_transcode::registry::VisibilityRule;
///
/// let active = |groups: &[&str]| groups.iter().map(|g| g.to_string()).collect::<Vec<_>>();
///
/// let rule = VisibilityRule::expose().all(["a", "b"]);
/// assert!(rule.matches(&active(&["a", "b"])));
/// assert!(!rule.matches(&active(&["a"])));
///
/// let rule = VisibilityRule::exclude().not_any(["a", "b"]);
/// assert!(rule.matches(&active(&[])));
/// assert!(!rule.matches(&active(&["b"])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pub expose: bool,
    pub force_expose: bool,
    pub all: Vec<String>,
    pub any: Vec<String>,
    pub not_all: Vec<String>,
    pub not_any: Vec<String>,
}

impl VisibilityRule {
    #[inline]
    pub const fn expose() -> Self {
        Self::new(true)
    }

    #[inline]
    pub const fn exclude() -> Self {
        Self::new(false)
    }

    const fn new(expose: bool) -> Self {
        Self {
            expose,
            force_expose: false,
            all: Vec::new(),
            any: Vec::new(),
            not_all: Vec::new(),
            not_any: Vec::new(),
        }
    }

    /// Exposes the whole subtree regardless of nested rules.
    #[inline]
    pub fn force(mut self) -> Self {
        self.force_expose = true;
        self
    }

    pub fn all<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn any<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_all<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_all = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_any<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_any = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Tests the rule against the active groups.
    pub fn matches(&self, groups: &[String]) -> bool {
        let has = |group: &String| groups.contains(group);

        let positive = if self.all.is_empty() && self.any.is_empty() {
            true
        } else {
            (!self.all.is_empty() && self.all.iter().all(has))
                || (!self.any.is_empty() && self.any.iter().any(has))
        };

        let negative = (self.not_all.is_empty() || !self.not_all.iter().all(has))
            && (self.not_any.is_empty() || !self.not_any.iter().any(has));

        positive && negative
    }
}

// -----------------------------------------------------------------------------
// Converters

/// Result of a property converter.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub value: Value,
    /// Ends the pipeline for the node with `value` as the final result.
    pub stop: bool,
}

impl Conversion {
    /// Passes the value on to the next stages.
    #[inline]
    pub const fn pass(value: Value) -> Self {
        Self { value, stop: false }
    }

    /// Makes the value final.
    #[inline]
    pub const fn done(value: Value) -> Self {
        Self { value, stop: true }
    }
}

/// A custom property converter.
///
/// Converters receive the current node value and the live traversal context.
#[derive(Clone)]
pub struct Converter(Arc<dyn Fn(Value, &Context<'_>) -> Conversion + Send + Sync>);

impl Converter {
    #[inline]
    pub fn new(f: impl Fn(Value, &Context<'_>) -> Conversion + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A serialize converter computing a value from the owning object.
    ///
    /// An already present value is kept as is.
    pub fn computed(f: impl Fn(&Value, &Context<'_>) -> Value + Send + Sync + 'static) -> Self {
        Self::new(move |value, ctx| {
            if !value.is_undefined() {
                return Conversion::done(value);
            }
            let parent = ctx.parent().unwrap_or_default();
            Conversion::done(f(&parent, ctx))
        })
    }

    /// Like [`computed`](Self::computed), choosing between two functions by
    /// whether any of `groups` is active.
    pub fn computed_by_groups<I, S>(
        groups: I,
        if_included: impl Fn(&Value, &Context<'_>) -> Value + Send + Sync + 'static,
        if_not_included: impl Fn(&Value, &Context<'_>) -> Value + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<String> = groups.into_iter().map(Into::into).collect();
        Self::computed(move |parent, ctx| {
            if groups.iter().any(|g| ctx.groups().contains(g)) {
                if_included(parent, ctx)
            } else {
                if_not_included(parent, ctx)
            }
        })
    }

    #[inline]
    pub fn apply(&self, value: Value, ctx: &Context<'_>) -> Conversion {
        (self.0)(value, ctx)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter")
    }
}

/// Converters of one property, per direction and position.
#[derive(Debug, Clone, Default)]
pub struct Converters {
    pub serialize_before: Option<Converter>,
    pub serialize_after: Option<Converter>,
    pub deserialize_before: Option<Converter>,
    pub deserialize_after: Option<Converter>,
}

impl Converters {
    /// Slot-wise override by `other`.
    fn merge(&mut self, other: &Converters) {
        fn slot(dst: &mut Option<Converter>, src: &Option<Converter>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        slot(&mut self.serialize_before, &other.serialize_before);
        slot(&mut self.serialize_after, &other.serialize_after);
        slot(&mut self.deserialize_before, &other.deserialize_before);
        slot(&mut self.deserialize_after, &other.deserialize_after);
    }
}

// -----------------------------------------------------------------------------
// Getter

/// Read-only accessor computing a property from its object.
#[derive(Clone)]
pub struct Getter(Arc<dyn Fn(&ObjectRef) -> Value + Send + Sync>);

impl Getter {
    #[inline]
    pub fn new(f: impl Fn(&ObjectRef) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn get(&self, object: &ObjectRef) -> Value {
        (self.0)(object)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter")
    }
}

// -----------------------------------------------------------------------------
// PropertyModifiers

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyModifiers {
    /// Copy the value verbatim, skipping the pipeline.
    pub force_raw: bool,
    /// Merge into the object already present on the instance.
    pub object_merge: bool,
    /// Append to the list already present on the instance.
    pub array_append: bool,
}

// -----------------------------------------------------------------------------
// PropertyFragment

/// Metadata declared for a property on one class level.
///
/// Unset fields leave the inherited value untouched.
#[derive(Debug, Clone, Default)]
pub struct PropertyFragment {
    pub access: Option<Access>,
    pub getter: Option<Getter>,
    pub type_hint: Option<TypeHint>,
    pub visibility_rules: Vec<VisibilityRule>,
    pub converters: Converters,
    pub modifiers: Option<PropertyModifiers>,
}

impl PropertyFragment {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn access(mut self, access: Access) -> Self {
        self.access = Some(access);
        self
    }

    /// Declares a computed read-only accessor.
    #[inline]
    pub fn getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self.access = Some(Access::ReadOnly);
        self
    }

    #[inline]
    pub fn hint(mut self, hint: TypeHint) -> Self {
        self.type_hint = Some(hint);
        self
    }

    #[inline]
    pub fn class(self, class: &'static Class) -> Self {
        self.hint(TypeHint::Class(class))
    }

    #[inline]
    pub fn array_of(self, class: &'static Class) -> Self {
        self.hint(TypeHint::ArrayOf(Some(class)))
    }

    #[inline]
    pub fn map_of(self, class: &'static Class) -> Self {
        self.hint(TypeHint::MapOf(Some(class)))
    }

    #[inline]
    pub fn rule(mut self, rule: VisibilityRule) -> Self {
        self.visibility_rules.push(rule);
        self
    }

    #[inline]
    pub fn expose(self) -> Self {
        self.rule(VisibilityRule::expose())
    }

    #[inline]
    pub fn exclude(self) -> Self {
        self.rule(VisibilityRule::exclude())
    }

    #[inline]
    pub fn serialize_before(mut self, converter: Converter) -> Self {
        self.converters.serialize_before = Some(converter);
        self
    }

    #[inline]
    pub fn serialize_after(mut self, converter: Converter) -> Self {
        self.converters.serialize_after = Some(converter);
        self
    }

    #[inline]
    pub fn deserialize_before(mut self, converter: Converter) -> Self {
        self.converters.deserialize_before = Some(converter);
        self
    }

    #[inline]
    pub fn deserialize_after(mut self, converter: Converter) -> Self {
        self.converters.deserialize_after = Some(converter);
        self
    }

    #[inline]
    pub fn modifiers(mut self, modifiers: PropertyModifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Folds a later declaration on the same class level into this one.
    ///
    /// Rules of `later` are placed in front, so they are evaluated first.
    pub(crate) fn absorb(&mut self, later: PropertyFragment) {
        if later.access.is_some() {
            self.access = later.access;
        }
        if later.getter.is_some() {
            self.getter = later.getter;
        }
        if later.type_hint.is_some() {
            self.type_hint = later.type_hint;
        }
        if later.modifiers.is_some() {
            self.modifiers = later.modifiers;
        }
        self.converters.merge(&later.converters);
        if !later.visibility_rules.is_empty() {
            let mut rules = later.visibility_rules;
            rules.append(&mut self.visibility_rules);
            self.visibility_rules = rules;
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// Effective metadata of a property, merged along the class chain.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub access: Access,
    pub getter: Option<Getter>,
    pub type_hint: TypeHint,
    pub visibility_rules: Vec<VisibilityRule>,
    pub converters: Converters,
    pub modifiers: PropertyModifiers,
}

impl PropertyDescriptor {
    /// Overrides fields declared by a more derived class level.
    pub(crate) fn apply(&mut self, level: &PropertyFragment) {
        if let Some(access) = level.access {
            self.access = access;
        }
        if level.getter.is_some() {
            self.getter.clone_from(&level.getter);
        }
        if let Some(hint) = level.type_hint {
            self.type_hint = hint;
        }
        if let Some(modifiers) = level.modifiers {
            self.modifiers = modifiers;
        }
        if !level.visibility_rules.is_empty() {
            self.visibility_rules.clone_from(&level.visibility_rules);
        }
        self.converters.merge(&level.converters);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn groups(list: &[&str]) -> Vec<String> {
        list.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn group_matching_table() {
        let all = VisibilityRule::expose().all(["a", "b"]);
        assert!(all.matches(&groups(&["a", "b"])));
        assert!(all.matches(&groups(&["b", "c", "a"])));
        assert!(!all.matches(&groups(&["a"])));
        assert!(!all.matches(&groups(&[])));

        let any = VisibilityRule::expose().any(["a", "b"]);
        assert!(any.matches(&groups(&["b"])));
        assert!(!any.matches(&groups(&["c"])));

        let not_all = VisibilityRule::expose().not_all(["a", "b"]);
        assert!(not_all.matches(&groups(&[])));
        assert!(not_all.matches(&groups(&["a"])));
        assert!(!not_all.matches(&groups(&["a", "b"])));

        let not_any = VisibilityRule::expose().not_any(["a", "b"]);
        assert!(not_any.matches(&groups(&["c"])));
        assert!(!not_any.matches(&groups(&["a"])));
        assert!(!not_any.matches(&groups(&["b"])));
    }

    #[test]
    fn combined_rule_requires_both_parts() {
        let rule = VisibilityRule::expose()
            .all(["g1", "g2"])
            .any(["g3", "g4"])
            .not_all(["g5", "g6"])
            .not_any(["g7", "g8"]);

        assert!(!rule.matches(&groups(&[])));
        assert!(rule.matches(&groups(&["g1", "g2"])));
        assert!(rule.matches(&groups(&["g4", "g5"])));
        assert!(!rule.matches(&groups(&["g3", "g5", "g6"])));
        assert!(!rule.matches(&groups(&["g3", "g8"])));
    }

    #[test]
    fn unconditional_rule_always_matches() {
        assert!(VisibilityRule::exclude().matches(&groups(&[])));
        assert!(VisibilityRule::exclude().matches(&groups(&["x"])));
    }

    #[test]
    fn later_rules_come_first() {
        let mut fragment = PropertyFragment::new().rule(VisibilityRule::expose().any(["g3"]));
        fragment.absorb(PropertyFragment::new().rule(VisibilityRule::exclude().any(["g2"])));

        let exposes: Vec<bool> = fragment.visibility_rules.iter().map(|r| r.expose).collect();
        assert_eq!(exposes, vec![false, true]);
    }

    #[test]
    fn descriptor_merges_per_field() {
        let base = PropertyFragment::new()
            .hint(TypeHint::ArrayOf(None))
            .expose()
            .modifiers(PropertyModifiers {
                array_append: true,
                ..Default::default()
            });
        let derived = PropertyFragment::new().access(Access::ReadOnly);

        let mut descriptor = PropertyDescriptor::default();
        descriptor.apply(&base);
        descriptor.apply(&derived);

        assert_eq!(descriptor.type_hint, TypeHint::ArrayOf(None));
        assert_eq!(descriptor.access, Access::ReadOnly);
        assert_eq!(descriptor.visibility_rules.len(), 1);
        assert!(descriptor.modifiers.array_append);
    }
}
