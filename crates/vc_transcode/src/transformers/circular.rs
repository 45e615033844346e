use vc_object::{ObjectRef, Value};

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;

/// Replaces a node already present on the path from the root.
///
/// Serialized, the repeat becomes an object link when links are enabled
/// and a `{type, id}` stub otherwise. Deserialized, it becomes an instance
/// holding only the id. Types without a descriptor drop the repeat.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularGuard;

const ORDER: i32 = -600;

impl Transformer for CircularGuard {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        value.node_id().is_some_and(|id| ctx.is_circular(id))
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        log::debug!("circular reference at `{}`", ctx.path());
        let Some(descriptor) = ctx.type_descriptor() else {
            return Ok(Value::Undefined);
        };
        let options = ctx.options();

        if options.use_reference_links && descriptor.name().is_some() {
            let link = ctx.links().build(&value, Some(descriptor), true)?;
            return Ok(Value::from(link));
        }

        let stub = ObjectRef::plain();
        if let Some(name) = descriptor.name() {
            stub.set(options.type_key.as_str(), name);
        }
        if let Some(id_key) = descriptor.id_property() {
            let id = value.get(id_key);
            if !id.is_undefined() {
                stub.set(id_key, id);
            }
        }
        Ok(Value::from(stub))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        log::debug!("circular reference at `{}`", ctx.path());
        let (Some(class), Some(descriptor)) = (ctx.class(), ctx.type_descriptor()) else {
            return Ok(Value::Undefined);
        };
        let Some(id_key) = descriptor.id_property() else {
            return Ok(Value::Undefined);
        };
        let instance = class.instantiate(false);
        instance.set(id_key, value.get(id_key));
        Ok(Value::from(instance))
    }
}
