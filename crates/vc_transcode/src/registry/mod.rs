//! Type and property metadata.
//!
//! [`Registry`] is populated once through explicit registration calls and
//! then read by every traversal.

// -----------------------------------------------------------------------------
// Modules

mod property;
mod type_descriptor;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use property::{
    Access, Conversion, Converter, Converters, Getter, PropertyDescriptor, PropertyFragment,
    PropertyModifiers, TypeHint, VisibilityRule,
};
pub use type_descriptor::{AutoGroup, TypeDefinition, TypeDescriptor, TypeModifiers};
pub use type_registry::Registry;
