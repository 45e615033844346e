use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::class::Class;
use crate::value::Value;

// -----------------------------------------------------------------------------
// NodeId

/// Reference identity of a shared object or list.
///
/// Two handles have the same id only when they point to the same allocation.
/// Ids are only meaningful while the allocation is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    fn of<T>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<u8>() as usize)
    }
}

// -----------------------------------------------------------------------------
// Object

/// Property storage of an object node.
///
/// A `None` class marks a plain object, which is also how maps and records
/// are represented. Property order is insertion order.
#[derive(Clone, Default)]
pub struct Object {
    class: Option<&'static Class>,
    props: IndexMap<String, Value>,
}

impl Object {
    #[inline]
    pub fn new(class: Option<&'static Class>) -> Self {
        Self {
            class,
            props: IndexMap::new(),
        }
    }

    #[inline]
    pub fn class(&self) -> Option<&'static Class> {
        self.class
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.props.get_mut(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Inserts or replaces a property, keeping the position of existing keys.
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.props.shift_remove(key)
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class)
            .field("keys", &self.props.keys().collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// Shared, interior-mutable handle to an [`Object`].
///
/// Cloning the handle shares the object. Equality is reference identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    #[inline]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Creates an empty plain object.
    #[inline]
    pub fn plain() -> Self {
        Self::new(Object::new(None))
    }

    /// Creates an empty instance of `class` without running initializers.
    #[inline]
    pub fn of(class: &'static Class) -> Self {
        Self::new(Object::new(Some(class)))
    }

    /// Builder-style property assignment.
    #[inline]
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    #[inline]
    pub fn class(&self) -> Option<&'static Class> {
        self.0.borrow().class
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Returns a copy of the property, or [`Value::Undefined`] when absent.
    #[inline]
    pub fn get(&self, key: &str) -> Value {
        self.0.borrow().get(key).cloned().unwrap_or_default()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    #[inline]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().set(key, value);
    }

    /// Snapshot of the current keys.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().map(String::from).collect()
    }

    #[inline]
    pub fn downgrade(&self) -> WeakNode {
        WeakNode::Object(Rc::downgrade(&self.0))
    }
}

impl PartialEq for ObjectRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => fmt::Debug::fmt(&*object, f),
            Err(_) => f.write_str("Object(<borrowed>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// ListRef

/// Shared, interior-mutable list. Equality is reference identity.
#[derive(Clone, Default)]
pub struct ListRef(Rc<RefCell<Vec<Value>>>);

impl ListRef {
    #[inline]
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Vec<Value>> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Copies the items out, so the list can be mutated while iterating.
    #[inline]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    #[inline]
    pub fn downgrade(&self) -> WeakNode {
        WeakNode::List(Rc::downgrade(&self.0))
    }
}

impl PartialEq for ListRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(items) => write!(f, "List(len = {})", items.len()),
            Err(_) => f.write_str("List(<borrowed>)"),
        }
    }
}

impl FromIterator<Value> for ListRef {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// -----------------------------------------------------------------------------
// WeakNode

/// Non-owning back reference to an object or list.
#[derive(Clone)]
pub enum WeakNode {
    Object(Weak<RefCell<Object>>),
    List(Weak<RefCell<Vec<Value>>>),
}

impl WeakNode {
    /// Returns the referenced node if it is still alive.
    pub fn upgrade(&self) -> Option<Value> {
        match self {
            Self::Object(weak) => weak.upgrade().map(|rc| Value::Object(ObjectRef(rc))),
            Self::List(weak) => weak.upgrade().map(|rc| Value::List(ListRef(rc))),
        }
    }

    /// Returns `true` if both point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Weak::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(_) => f.write_str("WeakNode::Object"),
            Self::List(_) => f.write_str("WeakNode::List"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn object_handles_share_state() {
        let a = ObjectRef::plain().with("x", 1);
        let b = a.clone();
        b.set("y", 2);

        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.keys(), vec!["x", "y"]);
        assert!(a.get("missing").is_undefined());
    }

    #[test]
    fn distinct_allocations_have_distinct_ids() {
        let a = ObjectRef::plain();
        let b = ObjectRef::plain();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn set_keeps_key_position() {
        let a = ObjectRef::plain().with("a", 1).with("b", 2).with("a", 3);
        assert_eq!(a.keys(), vec!["a", "b"]);
        assert_eq!(a.get("a").as_f64(), Some(3.0));
    }

    #[test]
    fn weak_node_upgrades_while_alive() {
        let list = ListRef::new(vec![Value::from(1)]);
        let weak = list.downgrade();
        assert!(matches!(weak.upgrade(), Some(Value::List(l)) if l.ptr_eq(&list)));
        drop(list);
        assert!(weak.upgrade().is_none());
    }
}
