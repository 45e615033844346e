use alloc::string::ToString;
use alloc::vec::Vec;

use vc_object::{ListRef, Value};

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;
use crate::registry::TypeHint;

/// Transcodes the items of list-typed nodes.
///
/// Items inherit depth, exposition graph and property descriptor of the
/// list. Items ending up `null` or missing are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayItems;

const ORDER: i32 = -700;

impl ArrayItems {
    fn apply(value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        let list = match value {
            Value::List(list) => list,
            other => {
                log::debug!("`{}` is not a list: {other:?}", ctx.path());
                return Ok(match ctx.direction() {
                    Direction::Serialize => Value::Undefined,
                    Direction::Deserialize => Value::from(ListRef::new(Vec::new())),
                });
            }
        };
        if ctx.is_circular(list.id()) {
            return Ok(Value::Undefined);
        }

        let item_hint = match ctx.type_hint() {
            TypeHint::ArrayOf(class) => TypeHint::item(class),
            _ => TypeHint::Auto,
        };
        let container = Value::List(list.clone());
        let items = list.to_vec();
        let mut output = Vec::with_capacity(items.len());

        for (idx, item) in items.into_iter().enumerate() {
            let result = ctx.fork(|ctx| {
                ctx.enter_item(&container, &idx.to_string(), item_hint);
                ctx.transcode(item)
            })?;
            if !result.is_nullish() {
                output.push(result);
            }
        }
        Ok(Value::from(output))
    }
}

impl Transformer for ArrayItems {
    fn name(&self) -> &'static str {
        "array"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        matches!(ctx.type_hint(), TypeHint::ArrayOf(_)) && !value.is_nullish()
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Self::apply(value, ctx)
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Self::apply(value, ctx)
    }
}
