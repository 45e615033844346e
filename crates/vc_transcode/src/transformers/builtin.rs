use vc_object::{ScalarKind, Value};

use crate::coerce;
use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;

/// Coerces values of built-in scalar classes to their canonical form and
/// ends the pipeline for the node.
///
/// Values that cannot be coerced become missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinScalar;

const ORDER: i32 = -200;

impl BuiltinScalar {
    fn kind(ctx: &Context<'_>) -> Option<ScalarKind> {
        ctx.class().and_then(|class| class.scalar_kind())
    }

    fn coerce(value: Value, kind: ScalarKind, direction: Direction) -> Value {
        match (kind, direction) {
            (ScalarKind::Number, _) => coerce::to_number(&value).into(),
            (ScalarKind::String, _) => coerce::to_string(&value).into(),
            (ScalarKind::Boolean, _) => coerce::to_bool(&value).into(),
            (ScalarKind::Date, Direction::Serialize) => match value {
                Value::Date(date) => coerce::date_to_iso(&date).into(),
                _ => Value::Undefined,
            },
            (ScalarKind::Date, Direction::Deserialize) => coerce::to_date(&value).into(),
            (ScalarKind::BigInt, Direction::Serialize) => match value {
                Value::BigInt(big) => big.to_str_radix(10).into(),
                _ => Value::Undefined,
            },
            (ScalarKind::BigInt, Direction::Deserialize) => coerce::to_big_int(&value).into(),
        }
    }

    fn apply(value: Value, ctx: &mut Context<'_>) -> Value {
        let Some(kind) = Self::kind(ctx) else {
            return value;
        };
        ctx.stop();
        let coerced = Self::coerce(value, kind, ctx.direction());
        if coerced.is_undefined() {
            log::debug!("`{}` is not a valid {kind:?}", ctx.path());
        }
        coerced
    }
}

impl Transformer for BuiltinScalar {
    fn name(&self) -> &'static str {
        "builtin-scalar"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, _: &Value, ctx: &mut Context<'_>) -> bool {
        Self::kind(ctx).is_some()
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(Self::apply(value, ctx))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        Ok(Self::apply(value, ctx))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use num_bigint::BigInt;

    fn ser(value: impl Into<Value>, kind: ScalarKind) -> Value {
        BuiltinScalar::coerce(value.into(), kind, Direction::Serialize)
    }

    fn de(value: impl Into<Value>, kind: ScalarKind) -> Value {
        BuiltinScalar::coerce(value.into(), kind, Direction::Deserialize)
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(de("12", ScalarKind::Number), Value::from(12));
        assert_eq!(de("twelve", ScalarKind::Number), Value::Undefined);
        assert_eq!(ser(true, ScalarKind::Number), Value::from(1));
        assert_eq!(ser(12, ScalarKind::String), Value::from("12"));
        assert_eq!(de("on", ScalarKind::Boolean), Value::from(false));
        assert_eq!(de("true", ScalarKind::Boolean), Value::from(true));
    }

    #[test]
    fn dates_round_trip_through_iso() {
        let date = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
        let plain = ser(date, ScalarKind::Date);
        assert_eq!(plain, Value::from("2020-05-17T08:30:00.000Z"));
        assert_eq!(de(plain, ScalarKind::Date), Value::from(date));
        assert_eq!(ser("2020-05-17", ScalarKind::Date), Value::Undefined);
    }

    #[test]
    fn big_integers_as_decimal_strings() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let plain = ser(big.clone(), ScalarKind::BigInt);
        assert_eq!(plain, Value::from("123456789012345678901234567890"));
        assert_eq!(de(plain, ScalarKind::BigInt), Value::from(big));
    }
}
