use vc_object::Value;

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;
use crate::registry::{Converter, Converters};

// -----------------------------------------------------------------------------
// Position

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    After,
}

fn slot(converters: &Converters, direction: Direction, position: Position) -> Option<&Converter> {
    match (direction, position) {
        (Direction::Serialize, Position::Before) => converters.serialize_before.as_ref(),
        (Direction::Serialize, Position::After) => converters.serialize_after.as_ref(),
        (Direction::Deserialize, Position::Before) => converters.deserialize_before.as_ref(),
        (Direction::Deserialize, Position::After) => converters.deserialize_after.as_ref(),
    }
}

fn has_converter(ctx: &Context<'_>, position: Position) -> bool {
    ctx.property_descriptor()
        .is_some_and(|desc| slot(&desc.converters, ctx.direction(), position).is_some())
}

fn convert(value: Value, ctx: &mut Context<'_>, position: Position) -> Value {
    let Some(descriptor) = ctx.property_descriptor() else {
        return value;
    };
    let Some(converter) = slot(&descriptor.converters, ctx.direction(), position) else {
        return value;
    };
    let conversion = converter.apply(value, ctx);
    if conversion.stop {
        ctx.stop();
    }
    conversion.value
}

// -----------------------------------------------------------------------------
// PropertyBefore

/// Applies the declared before-converter of the current property.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyBefore;

const BEFORE_ORDER: i32 = -400;

impl Transformer for PropertyBefore {
    fn name(&self) -> &'static str {
        "property-before"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(BEFORE_ORDER)
    }

    fn preflight(&self, _: &Value, ctx: &mut Context<'_>) -> bool {
        has_converter(ctx, Position::Before)
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(convert(value, ctx, Position::Before))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(convert(value, ctx, Position::Before))
    }
}

// -----------------------------------------------------------------------------
// PropertyAfter

/// Applies the declared after-converter of the current property.
///
/// Only reached when no earlier stage ended the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAfter;

const AFTER_ORDER: i32 = 400;

impl Transformer for PropertyAfter {
    fn name(&self) -> &'static str {
        "property-after"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(AFTER_ORDER)
    }

    fn preflight(&self, _: &Value, ctx: &mut Context<'_>) -> bool {
        has_converter(ctx, Position::After)
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(convert(value, ctx, Position::After))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(convert(value, ctx, Position::After))
    }
}
