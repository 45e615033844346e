use alloc::string::String;
use alloc::vec::Vec;

use vc_object::{ObjectRef, Value};

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;
use crate::registry::TypeHint;

/// Transcodes the values of map-typed nodes into a plain object.
///
/// Entries ending up missing are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapValues;

const ORDER: i32 = -700;

impl MapValues {
    fn apply(value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        let Value::Object(map) = value else {
            log::debug!("`{}` is not a map", ctx.path());
            return Ok(Value::Undefined);
        };
        if ctx.is_circular(map.id()) {
            return Ok(Value::Undefined);
        }

        let value_hint = match ctx.type_hint() {
            TypeHint::MapOf(class) => TypeHint::item(class),
            _ => TypeHint::Auto,
        };
        let container = Value::Object(map.clone());
        let entries: Vec<(String, Value)> = map
            .borrow()
            .iter()
            .map(|(key, value)| (String::from(key), value.clone()))
            .collect();
        let output = ObjectRef::plain();

        for (key, entry) in entries {
            let result = ctx.fork(|ctx| {
                ctx.enter_item(&container, &key, value_hint);
                ctx.transcode(entry)
            })?;
            if !result.is_undefined() {
                output.set(key, result);
            }
        }
        Ok(Value::from(output))
    }
}

impl Transformer for MapValues {
    fn name(&self) -> &'static str {
        "map"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        matches!(ctx.type_hint(), TypeHint::MapOf(_)) && !value.is_nullish()
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Self::apply(value, ctx)
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Self::apply(value, ctx)
    }
}
