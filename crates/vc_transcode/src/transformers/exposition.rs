use vc_object::Value;

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::exposition::is_visible;
use crate::pipeline::Transformer;

/// Drops hidden nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exposition;

const ORDER: i32 = -800;

impl Exposition {
    fn apply(value: Value, ctx: &mut Context<'_>) -> Value {
        if is_visible(ctx) {
            return value;
        }
        log::trace!("`{}` is hidden", ctx.path());
        ctx.stop();
        Value::Undefined
    }
}

impl Transformer for Exposition {
    fn name(&self) -> &'static str {
        "exposition"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    fn preflight(&self, _: &Value, _: &mut Context<'_>) -> bool {
        true
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(Self::apply(value, ctx))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(Self::apply(value, ctx))
    }
}
