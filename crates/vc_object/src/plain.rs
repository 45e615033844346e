use core::cell::RefCell;

use alloc::string::ToString;
use alloc::vec::Vec;

use chrono::SecondsFormat;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;

use crate::node::{ListRef, NodeId, Object, ObjectRef};
use crate::value::Value;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// -----------------------------------------------------------------------------
// Serialize

/// Serializes with a guard against reference cycles.
///
/// A node that is already on the current path is written as `null`.
struct Guarded<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<NodeId>>,
}

impl Guarded<'_> {
    #[inline]
    fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b> {
        Guarded {
            value,
            path: self.path,
        }
    }

    fn enter(&self, id: NodeId) -> bool {
        let mut path = self.path.borrow_mut();
        if path.contains(&id) {
            return false;
        }
        path.push(id);
        true
    }

    fn leave(&self) {
        self.path.borrow_mut().pop();
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::BigInt(b) => serializer.serialize_str(&b.to_str_radix(10)),
            Value::List(list) => {
                if !self.enter(list.id()) {
                    return serializer.serialize_unit();
                }
                let items = list.borrow();
                let result = serialize_items(self, &items, serializer);
                self.leave();
                result
            }
            Value::Object(object) => {
                if !self.enter(object.id()) {
                    return serializer.serialize_unit();
                }
                let props = object.borrow();
                let result = serialize_props(self, &props, serializer);
                self.leave();
                result
            }
        }
    }
}

fn serialize_items<S: Serializer>(
    guard: &Guarded<'_>,
    items: &[Value],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(&guard.child(item))?;
    }
    seq.end()
}

fn serialize_props<S: Serializer>(
    guard: &Guarded<'_>,
    props: &Object,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let len = props.iter().filter(|(_, v)| !v.is_undefined()).count();
    let mut map = serializer.serialize_map(Some(len))?;
    for (key, value) in props.iter() {
        if value.is_undefined() {
            continue;
        }
        map.serialize_entry(key, &guard.child(value))?;
    }
    map.end()
}

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

/// Plain serialization of a value.
///
/// Integral numbers are written as integers, dates as ISO-8601 strings with
/// millisecond precision, big integers as decimal strings. `Undefined`
/// properties are skipped and cyclic back edges are written as `null`.
impl Serialize for Value {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let path = RefCell::new(Vec::new());
        Guarded { value: self, path: &path }.serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// JSON conversion

impl Value {
    /// Converts to a JSON value, `None` for `Undefined`.
    pub fn to_json(&self) -> Option<JsonValue> {
        if self.is_undefined() {
            return None;
        }
        serde_json::to_value(self).ok()
    }

    /// Builds a value from JSON. Objects become plain objects.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            JsonValue::String(s) => Value::String(s.to_string()),
            JsonValue::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect::<ListRef>())
            }
            JsonValue::Object(map) => {
                let object = ObjectRef::plain();
                {
                    let mut props = object.borrow_mut();
                    for (key, value) in map {
                        props.set(key.as_str(), Value::from_json(value));
                    }
                }
                Value::Object(object)
            }
        }
    }
}

impl From<&JsonValue> for Value {
    #[inline]
    fn from(json: &JsonValue) -> Self {
        Value::from_json(json)
    }
}

// -----------------------------------------------------------------------------
// Tests
