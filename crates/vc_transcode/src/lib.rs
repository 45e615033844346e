//! Bidirectional, metadata driven transcoding between typed object graphs
//! and plain data.
//!
//! Classes are described once in a [`Registry`](registry::Registry): wire
//! names, id properties, property types, visibility rules, converters and
//! modifiers. A [`Serializer`] then walks object graphs through an ordered
//! [`Pipeline`] of [`Transformer`] stages, in either direction:
//!
//! - serialization turns instances into plain objects tagged with a type
//!   discriminator, hides what the visibility rules, groups and exposition
//!   graphs exclude, and breaks cycles with stubs or object links;
//! - deserialization resolves the discriminator back to classes,
//!   instantiates them, expands object links and coerces scalars.
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use vc_object::{Class, Object, ObjectRef, Value};
//! use vc_transcode::registry::{PropertyFragment, Registry, TypeDefinition};
//! use vc_transcode::{Options, Serializer};
//!
//! fn init_note(o: &mut Object) {
//!     o.set("id", 0);
//!     o.set("text", "");
//! }
//!
//! static NOTE: Class = Class::new("Note").with_init(init_note);
//!
//! let mut registry = Registry::new();
//! registry.register_type(&NOTE, TypeDefinition::named("note").id("id")).unwrap();
//! registry.register_property(&NOTE, "text", PropertyFragment::new().expose());
//!
//! let serializer = Serializer::new(Arc::new(registry));
//! let note = Value::from(ObjectRef::of(&NOTE).with("id", 3).with("text", "hi"));
//!
//! let linked = Options::new().use_reference_links(true);
//! assert_eq!(
//!     serializer.serialize(&note, &linked).unwrap(),
//!     Some(json!({ "@type": "note", "@id": "@/note/3", "id": 3, "text": "hi" })),
//! );
//!
//! let copy = serializer.clone_value(&note).unwrap();
//! assert_ne!(copy, note);
//! assert_eq!(copy.get("text"), Value::from("hi"));
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod coerce;
pub mod error;
pub mod exposition;
pub mod graph;
pub mod link;
pub mod registry;
pub mod transformers;

mod context;
mod hash;
mod options;
mod pipeline;
mod serializer;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use context::{Context, Direction};
pub use error::{LinkError, RegistryError, TranscodeError};
pub use graph::{ExposeGraph, GraphNode};
pub use link::{ObjectLink, ObjectLinkCodec};
pub use options::{
    DEFAULT_LINK_KEY, DEFAULT_TYPE_KEY, Options, ResolvedOptions, SerializerConfig, Target,
};
pub use pipeline::{Pipeline, Transformer};
pub use serializer::Serializer;
