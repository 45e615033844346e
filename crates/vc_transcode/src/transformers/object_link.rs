use vc_object::Value;

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::link::LINK_PREFIX;
use crate::pipeline::Transformer;

// -----------------------------------------------------------------------------
// ObjectLinkExpansion

/// Handles scalars standing in for objects of a type with an id.
///
/// Serialized with links enabled, a bare id becomes the object link.
/// Deserialized, an object link or a bare id becomes an instance holding
/// only the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectLinkExpansion;

const EXPANSION_ORDER: i32 = -100;

fn keep_initial_values(ctx: &Context<'_>) -> bool {
    ctx.type_descriptor()
        .and_then(|desc| desc.modifiers().keep_initial_values)
        .unwrap_or(ctx.options().keep_initial_values)
}

impl Transformer for ObjectLinkExpansion {
    fn name(&self) -> &'static str {
        "object-link"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(EXPANSION_ORDER)
    }

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        if !value.is_scalar() || ctx.class().is_none() {
            return false;
        }
        let Some(descriptor) = ctx.type_descriptor() else {
            return false;
        };
        match ctx.direction() {
            Direction::Serialize => {
                ctx.options().use_reference_links
                    && descriptor.id_property().is_some()
                    && descriptor.name().is_some()
            }
            Direction::Deserialize => descriptor.id_property().is_some(),
        }
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        let Some(descriptor) = ctx.type_descriptor() else {
            return Ok(Value::Undefined);
        };
        Ok(Value::from(ctx.links().build_id(&value, descriptor, true)?))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        let (Some(class), Some(id_key)) = (
            ctx.class(),
            ctx.type_descriptor().and_then(|desc| desc.id_property()),
        ) else {
            return Ok(Value::Undefined);
        };
        let codec = ctx.links();
        let keep = keep_initial_values(ctx);

        if let Value::String(text) = &value {
            if text.starts_with(LINK_PREFIX) {
                let link = codec.parse(text)?;
                let linked_id_key = ctx
                    .registry()
                    .type_descriptor(link.class)
                    .and_then(|desc| desc.id_property())
                    .unwrap_or(id_key);
                let instance = link.class.instantiate(keep);
                instance.set(linked_id_key, link.id);
                return Ok(Value::from(instance));
            }
        }

        let instance = class.instantiate(keep);
        instance.set(id_key, codec.coerce_id(class, id_key, value));
        Ok(Value::from(instance))
    }
}

// -----------------------------------------------------------------------------
// ReduceToLink

/// Collapses a serialized object carrying nothing but its type, link and id
/// into the link string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceToLink;

const REDUCE_ORDER: i32 = 100;

impl Transformer for ReduceToLink {
    fn name(&self) -> &'static str {
        "reduce-to-link"
    }

    fn order(&self, direction: Direction) -> Option<i32> {
        (direction == Direction::Serialize).then_some(REDUCE_ORDER)
    }

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        let options = ctx.options();
        if !options.use_reference_links {
            return false;
        }
        let (Value::Object(object), Some(id_key)) = (
            value,
            ctx.type_descriptor().and_then(|desc| desc.id_property()),
        ) else {
            return false;
        };
        if object.class().is_some() || !object.get(id_key).is_truthy() {
            return false;
        }
        let object = object.borrow();
        let allowed = [options.type_key.as_str(), options.link_key.as_str(), id_key];
        let mut present = 0;
        for (key, value) in object.iter() {
            if value.is_undefined() {
                continue;
            }
            if !allowed.contains(&key) {
                return false;
            }
            present += 1;
        }
        present == allowed.len() && matches!(object.get(&options.link_key), Some(Value::String(_)))
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(value.get(&ctx.options().link_key))
    }
}
