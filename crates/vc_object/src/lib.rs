//! Dynamic object model used by the transcoder.
//!
//! Values are loosely typed: an object carries an optional [`Class`] handle
//! and an ordered property map, lists and objects are shared handles with
//! reference identity, and scalars cover booleans, numbers, strings, dates
//! and big integers.
//!
//! ```
//! use vc_object::{Class, ObjectRef, Value};
//!
//! static POINT: Class = Class::new("Point");
//!
//! let point = ObjectRef::of(&POINT).with("x", 1).with("y", 2);
//! let value = Value::from(point);
//!
//! assert_eq!(value.class(), Some(&POINT));
//! assert_eq!(value.to_json(), Some(serde_json::json!({ "x": 1, "y": 2 })));
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod class;
mod node;
mod plain;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use class::{BIG_INT, BOOLEAN, Chain, Class, DATE, NUMBER, STRING, ScalarKind};
pub use node::{ListRef, NodeId, Object, ObjectRef, WeakNode};
pub use value::Value;

pub use chrono;
pub use num_bigint;
