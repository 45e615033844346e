//! Built-in pipeline stages.
//!
//! | Order | Stage                 | Directions |
//! |-------|-----------------------|------------|
//! | -900  | [`TypeResolution`]    | both       |
//! | -800  | [`Exposition`]        | both       |
//! | -700  | [`ArrayItems`]        | both       |
//! | -700  | [`MapValues`]         | both       |
//! | -600  | [`CircularGuard`]     | both       |
//! | -500  | [`AutoGroups`]        | both       |
//! | -400  | [`PropertyBefore`]    | both       |
//! | -300  | [`Trivial`]           | both       |
//! | -200  | [`BuiltinScalar`]     | both       |
//! | -100  | [`ObjectLinkExpansion`] | both     |
//! | 0     | [`ObjectProperties`]  | both       |
//! | 100   | [`ReduceToLink`]      | serialize  |
//! | 400   | [`PropertyAfter`]     | both       |

// -----------------------------------------------------------------------------
// Modules

mod array;
mod auto_groups;
mod builtin;
mod circular;
mod converters;
mod exposition;
mod map;
mod object;
mod object_link;
mod trivial;
mod type_resolution;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayItems;
pub use auto_groups::AutoGroups;
pub use builtin::BuiltinScalar;
pub use circular::CircularGuard;
pub use converters::{PropertyAfter, PropertyBefore};
pub use exposition::Exposition;
pub use map::MapValues;
pub use object::ObjectProperties;
pub use object_link::{ObjectLinkExpansion, ReduceToLink};
pub use trivial::Trivial;
pub use type_resolution::TypeResolution;

use crate::pipeline::Pipeline;

pub(crate) fn register_builtins(pipeline: &mut Pipeline) {
    pipeline
        .register(TypeResolution)
        .register(Exposition)
        .register(ArrayItems)
        .register(MapValues)
        .register(CircularGuard)
        .register(AutoGroups)
        .register(PropertyBefore)
        .register(Trivial)
        .register(BuiltinScalar)
        .register(ObjectLinkExpansion)
        .register(ObjectProperties)
        .register(ReduceToLink)
        .register(PropertyAfter);
}
