use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr;

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::{Object, ObjectRef};

// -----------------------------------------------------------------------------
// ScalarKind

/// Built-in scalar shapes with a canonical plain representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Number,
    String,
    Date,
    BigInt,
}

// -----------------------------------------------------------------------------
// Class

/// A static class handle.
///
/// Classes are declared as `static` items and compared by address, so two
/// handles are equal only when they refer to the same declaration.
/// The parent link forms an explicit ancestry list that replaces language
/// level inheritance.
///
/// The optional initializer plays the role of a constructor: it assigns
/// the initial property values of a fresh instance. Initializers of the
/// whole chain run from the most-base class to the class itself.
///
/// # Examples
///
/// ```
/// use vc_object::{Class, Object};
///
/// fn init_user(o: &mut Object) {
///     o.set("id", 0);
///     o.set("name", "guest");
/// }
///
/// fn init_admin(o: &mut Object) {
///     o.set("level", 10);
/// }
///
/// static USER: Class = Class::new("User").with_init(init_user);
/// static ADMIN: Class = Class::new("Admin").extends(&USER).with_init(init_admin);
///
/// assert!(ADMIN.is_a(&USER));
/// assert!(!USER.is_a(&ADMIN));
///
/// let admin = ADMIN.instantiate(true);
/// assert_eq!(admin.get("name").as_str(), Some("guest"));
/// assert_eq!(admin.get("level").as_f64(), Some(10.0));
/// ```
pub struct Class {
    ident: &'static str,
    parent: Option<&'static Class>,
    init: Option<fn(&mut Object)>,
    scalar: Option<ScalarKind>,
}

impl Class {
    /// Creates a root class with the given short identifier.
    #[inline]
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            parent: None,
            init: None,
            scalar: None,
        }
    }

    const fn scalar(ident: &'static str, kind: ScalarKind) -> Self {
        Self {
            ident,
            parent: None,
            init: None,
            scalar: Some(kind),
        }
    }

    /// Sets the parent class.
    #[inline]
    pub const fn extends(self, parent: &'static Class) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// Sets the instance initializer.
    #[inline]
    pub const fn with_init(self, init: fn(&mut Object)) -> Self {
        Self {
            init: Some(init),
            ..self
        }
    }

    /// Returns the short identifier, e.g. `"Worker"`.
    #[inline]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// Returns the direct parent class.
    #[inline]
    pub const fn parent(&self) -> Option<&'static Class> {
        self.parent
    }

    /// Returns the scalar kind of built-in classes.
    #[inline]
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        self.scalar
    }

    /// Iterates the class itself followed by its ancestors.
    #[inline]
    pub fn chain(&'static self) -> Chain {
        Chain { next: Some(self) }
    }

    /// Returns `true` if `other` is this class or one of its ancestors.
    pub fn is_a(&'static self, other: &'static Class) -> bool {
        self.chain().any(|class| class == other)
    }

    /// Creates a new instance.
    ///
    /// With `run_init` the initializers of the chain are applied, base first.
    /// Without it the instance starts empty, like an object created from a
    /// prototype without calling its constructor.
    pub fn instantiate(&'static self, run_init: bool) -> ObjectRef {
        let mut object = Object::new(Some(self));
        if run_init {
            self.initialize(&mut object);
        }
        ObjectRef::new(object)
    }

    /// Runs the initializers of the whole chain against `object`.
    pub fn initialize(&'static self, object: &mut Object) {
        let chain: Vec<&'static Class> = self.chain().collect();
        for class in chain.into_iter().rev() {
            if let Some(init) = class.init {
                init(object);
            }
        }
    }

    /// Keys assigned by the initializers, in assignment order.
    pub fn initial_keys(&'static self) -> Vec<String> {
        let mut scratch = Object::new(Some(self));
        self.initialize(&mut scratch);
        scratch.keys().map(String::from).collect()
    }
}

impl PartialEq for Class {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for Class {}

impl Hash for Class {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self, state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident)
    }
}

// -----------------------------------------------------------------------------
// Chain

/// Iterator over a class and its ancestors, see [`Class::chain`].
#[derive(Clone)]
pub struct Chain {
    next: Option<&'static Class>,
}

impl Iterator for Chain {
    type Item = &'static Class;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// Built-in classes

pub static BOOLEAN: Class = Class::scalar("Boolean", ScalarKind::Boolean);
pub static NUMBER: Class = Class::scalar("Number", ScalarKind::Number);
pub static STRING: Class = Class::scalar("String", ScalarKind::String);
pub static DATE: Class = Class::scalar("Date", ScalarKind::Date);
pub static BIG_INT: Class = Class::scalar("BigInt", ScalarKind::BigInt);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn init_base(o: &mut Object) {
        o.set("id", 1);
        o.set("kind", "base");
    }

    fn init_child(o: &mut Object) {
        o.set("kind", "child");
        o.set("extra", true);
    }

    static BASE: Class = Class::new("Base").with_init(init_base);
    static CHILD: Class = Class::new("Child").extends(&BASE).with_init(init_child);
    static OTHER: Class = Class::new("Base");

    #[test]
    fn identity_is_by_address() {
        assert_eq!(&BASE, &BASE);
        assert_ne!(&BASE, &OTHER);
        assert_eq!(BASE.ident(), OTHER.ident());
    }

    #[test]
    fn chain_walks_to_root() {
        let idents: Vec<_> = CHILD.chain().map(Class::ident).collect();
        assert_eq!(idents, vec!["Child", "Base"]);
        assert!(CHILD.is_a(&BASE));
        assert!(!BASE.is_a(&CHILD));
        assert!(!CHILD.is_a(&OTHER));
    }

    #[test]
    fn initializers_run_base_first() {
        let child = CHILD.instantiate(true);
        assert_eq!(child.get("kind").as_str(), Some("child"));
        assert_eq!(child.get("id").as_f64(), Some(1.0));
        assert_eq!(CHILD.initial_keys(), vec!["id", "kind", "extra"]);

        let bare = CHILD.instantiate(false);
        assert!(bare.borrow().is_empty());
        assert_eq!(bare.class(), Some(&CHILD));
    }

    #[test]
    fn builtins_carry_scalar_kind() {
        assert_eq!(NUMBER.scalar_kind(), Some(ScalarKind::Number));
        assert_eq!(BASE.scalar_kind(), None);
    }
}
