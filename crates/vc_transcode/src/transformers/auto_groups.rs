use alloc::string::String;
use alloc::vec::Vec;

use vc_object::Value;

use crate::context::{Context, Direction};
use crate::pipeline::Transformer;

/// Activates the groups of matching auto-group entries of the current type
/// for the rest of the branch.
///
/// Runs entirely in [`preflight`](Transformer::preflight) and never
/// converts the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGroups;

const ORDER: i32 = -500;

impl Transformer for AutoGroups {
    fn name(&self) -> &'static str {
        "auto-groups"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        let Some(descriptor) = ctx.type_descriptor() else {
            return false;
        };
        let matched: Vec<&String> = descriptor
            .auto_groups()
            .iter()
            .filter(|entry| entry.test(value, ctx))
            .flat_map(|entry| entry.groups())
            .collect();
        if !matched.is_empty() {
            log::trace!("auto groups {matched:?} at `{}`", ctx.path());
            ctx.add_groups(matched);
        }
        false
    }
}
