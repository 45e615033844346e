use vc_object::{Class, Value};

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;
use crate::registry::TypeHint;

/// Resolves the class of the current node from the declared hint, the
/// runtime value and, when deserializing, the type discriminator.
///
/// A declared class restricts the outcome: a runtime or discriminated
/// class is kept only when it is the declared class or a subclass of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolution;

const ORDER: i32 = -900;

impl TypeResolution {
    fn resolve(provided: Option<&'static Class>, hint: TypeHint) -> Option<&'static Class> {
        match hint {
            TypeHint::Class(restriction) => match provided {
                Some(class) if class.is_a(restriction) => Some(class),
                _ => Some(restriction),
            },
            _ => provided,
        }
    }

    fn discriminated(value: &Value, ctx: &Context<'_>) -> Option<&'static Class> {
        let Value::Object(object) = value else {
            return value.class();
        };
        let key = ctx.options().type_key.as_str();
        let provided = match object.borrow().get(key) {
            Some(Value::String(name)) => {
                let class = ctx.registry().type_by_name(name);
                if class.is_none() {
                    log::debug!("unknown type `{name}` at `{}`", ctx.path());
                }
                class
            }
            _ => None,
        };
        provided.or_else(|| object.class())
    }
}

impl Transformer for TypeResolution {
    fn name(&self) -> &'static str {
        "type-resolution"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        match ctx.type_hint() {
            TypeHint::ArrayOf(_) | TypeHint::MapOf(_) => false,
            TypeHint::Auto if matches!(value, Value::List(_)) => {
                ctx.set_type_hint(TypeHint::ArrayOf(None));
                false
            }
            TypeHint::Auto | TypeHint::Class(_) => true,
        }
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.set_class(Self::resolve(value.class(), ctx.type_hint()));
        Ok(value)
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let provided = Self::discriminated(&value, ctx);
        ctx.set_class(Self::resolve(provided, ctx.type_hint()));
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: Class = Class::new("Base");
    static DERIVED: Class = Class::new("Derived").extends(&BASE);
    static OTHER: Class = Class::new("Other");

    #[test]
    fn declared_class_restricts() {
        let hint = TypeHint::Class(&BASE);
        assert_eq!(TypeResolution::resolve(Some(&DERIVED), hint), Some(&DERIVED));
        assert_eq!(TypeResolution::resolve(Some(&OTHER), hint), Some(&BASE));
        assert_eq!(TypeResolution::resolve(None, hint), Some(&BASE));
        assert_eq!(TypeResolution::resolve(Some(&OTHER), TypeHint::Auto), Some(&OTHER));
        assert_eq!(TypeResolution::resolve(None, TypeHint::Auto), None);
    }
}
