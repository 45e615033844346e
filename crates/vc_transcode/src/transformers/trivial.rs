use vc_object::Value;

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;

/// Passes `null` and missing values through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;

const ORDER: i32 = -300;

impl Transformer for Trivial {
    fn name(&self) -> &'static str {
        "trivial"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, value: &Value, _: &mut Context<'_>) -> bool {
        value.is_nullish()
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        Ok(value)
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        Ok(value)
    }
}
