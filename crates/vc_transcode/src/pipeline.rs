use core::fmt;

use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::Value;

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::transformers;

// -----------------------------------------------------------------------------
// Transformer

/// A pipeline stage.
///
/// A stage declares its position per direction through [`order`], a lower
/// order running earlier. [`preflight`] decides whether the stage applies
/// to the current node; it may also adjust the context. The conversion
/// receives the output of the previous stage and may end the pipeline for
/// the node with [`Context::stop`].
///
/// [`order`]: Transformer::order
/// [`preflight`]: Transformer::preflight
///
/// # Examples
///
/// ```
/// use vc_object::Value;
/// use vc_transcode::{Context, Direction, Pipeline, Transformer, TranscodeError};
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     fn name(&self) -> &'static str {
///         "upper"
///     }
///
///     fn order(&self, direction: Direction) -> Option<i32> {
///         (direction == Direction::Serialize).then_some(-250)
///     }
///
///     fn preflight(&self, value: &Value, _: &mut Context<'_>) -> bool {
///         value.as_str().is_some()
///     }
///
///     fn serialize(&self, value: Value, _: &mut Context<'_>) -> Result<Value, TranscodeError> {
///         Ok(Value::from(value.as_str().unwrap_or_default().to_uppercase()))
///     }
/// }
///
/// let mut pipeline = Pipeline::new();
/// pipeline.register(Upper);
/// assert!(pipeline.stages(Direction::Serialize).any(|stage| stage.name() == "upper"));
/// assert!(!pipeline.stages(Direction::Deserialize).any(|stage| stage.name() == "upper"));
/// ```
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Position in the pipeline of `direction`, `None` to skip it.
    fn order(&self, direction: Direction) -> Option<i32>;

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool;

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let _ = ctx;
        Ok(value)
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let _ = ctx;
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Pipeline

type Stage = (i32, Arc<dyn Transformer>);

/// Ordered stages of both directions.
///
/// Stages with equal order keep their registration order.
#[derive(Clone)]
pub struct Pipeline {
    serialize: Vec<Stage>,
    deserialize: Vec<Stage>,
}

impl Default for Pipeline {
    /// See [`Pipeline::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// A pipeline with the built-in stages.
    pub fn new() -> Self {
        let mut pipeline = Self::empty();
        transformers::register_builtins(&mut pipeline);
        pipeline
    }

    /// A pipeline without any stage.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            serialize: Vec::new(),
            deserialize: Vec::new(),
        }
    }

    /// Adds a stage to the directions it declares an order for.
    pub fn register(&mut self, stage: impl Transformer + 'static) -> &mut Self {
        self.register_arc(Arc::new(stage))
    }

    pub fn register_arc(&mut self, stage: Arc<dyn Transformer>) -> &mut Self {
        if let Some(order) = stage.order(Direction::Serialize) {
            insert(&mut self.serialize, order, Arc::clone(&stage));
        }
        if let Some(order) = stage.order(Direction::Deserialize) {
            insert(&mut self.deserialize, order, stage);
        }
        self
    }

    /// Stages of `direction` in execution order.
    pub fn stages(&self, direction: Direction) -> impl Iterator<Item = &dyn Transformer> {
        self.list(direction).iter().map(|(_, stage)| &**stage)
    }

    #[inline]
    fn list(&self, direction: Direction) -> &[Stage] {
        match direction {
            Direction::Serialize => &self.serialize,
            Direction::Deserialize => &self.deserialize,
        }
    }

    /// Runs the stages applying to `value` until one stops the node.
    pub fn run(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let direction = ctx.direction();
        let mut value = value;
        ctx.resume();

        for (_, stage) in self.list(direction) {
            if !stage.preflight(&value, ctx) {
                continue;
            }
            value = match direction {
                Direction::Serialize => stage.serialize(value, ctx)?,
                Direction::Deserialize => stage.deserialize(value, ctx)?,
            };
            if ctx.is_stopped() {
                log::trace!("`{}` stopped at `{}`", stage.name(), ctx.path());
                break;
            }
        }
        Ok(value)
    }
}

fn insert(stages: &mut Vec<Stage>, order: i32, stage: Arc<dyn Transformer>) {
    let at = stages.partition_point(|(existing, _)| *existing <= order);
    stages.insert(at, (order, stage));
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |stages: &[Stage]| -> Vec<(i32, &'static str)> {
            stages.iter().map(|(order, stage)| (*order, stage.name())).collect()
        };
        f.debug_struct("Pipeline")
            .field("serialize", &names(&self.serialize))
            .field("deserialize", &names(&self.deserialize))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Fixed(&'static str, Option<i32>, Option<i32>);

    impl Transformer for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn order(&self, direction: Direction) -> Option<i32> {
            match direction {
                Direction::Serialize => self.1,
                Direction::Deserialize => self.2,
            }
        }

        fn preflight(&self, _: &Value, _: &mut Context<'_>) -> bool {
            true
        }
    }

    fn names(pipeline: &Pipeline, direction: Direction) -> Vec<&'static str> {
        pipeline.stages(direction).map(Transformer::name).collect()
    }

    #[test]
    fn stages_sort_stably_per_direction() {
        let mut pipeline = Pipeline::empty();
        pipeline
            .register(Fixed("late", Some(10), Some(-10)))
            .register(Fixed("early", Some(-10), Some(10)))
            .register(Fixed("tie", Some(10), None))
            .register(Fixed("deserialize-only", None, Some(0)));

        assert_eq!(names(&pipeline, Direction::Serialize), vec!["early", "late", "tie"]);
        assert_eq!(
            names(&pipeline, Direction::Deserialize),
            vec!["late", "deserialize-only", "early"]
        );
    }

    #[test]
    fn builtin_order() {
        let pipeline = Pipeline::new();
        assert_eq!(
            names(&pipeline, Direction::Serialize),
            vec![
                "type-resolution",
                "exposition",
                "array",
                "map",
                "circular",
                "auto-groups",
                "property-before",
                "trivial",
                "builtin-scalar",
                "object-link",
                "object",
                "reduce-to-link",
                "property-after",
            ]
        );
        assert_eq!(
            names(&pipeline, Direction::Deserialize),
            vec![
                "type-resolution",
                "exposition",
                "array",
                "map",
                "circular",
                "auto-groups",
                "property-before",
                "trivial",
                "builtin-scalar",
                "object-link",
                "object",
                "property-after",
            ]
        );
    }
}
