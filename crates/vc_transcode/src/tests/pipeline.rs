use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;

use serde_json::json;
use vc_object::{Class, NUMBER, ObjectRef, STRING, Value};

use super::{author, library, serialize};
use crate::registry::{PropertyFragment, Registry, TypeDefinition};
use crate::{Context, Direction, Options, Serializer, TranscodeError, Transformer};

/// Masks every string of a node whose property key is `secret`.
struct Mask;

impl Transformer for Mask {
    fn name(&self) -> &'static str {
        "mask"
    }

    fn order(&self, direction: Direction) -> Option<i32> {
        (direction == Direction::Serialize).then_some(-250)
    }

    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        ctx.property_key() == Some("secret") && value.as_str().is_some()
    }

    fn serialize(&self, _: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        ctx.stop();
        Ok(Value::from("***"))
    }
}

#[test]
fn custom_stages_join_the_pipeline() {
    let mut serializer = library();
    serializer.pipeline_mut().register(Mask);

    let names: alloc::vec::Vec<_> = serializer
        .pipeline()
        .stages(Direction::Serialize)
        .map(|stage| stage.name())
        .collect();
    let trivial = names.iter().position(|name| *name == "trivial");
    let mask = names.iter().position(|name| *name == "mask");
    assert!(trivial < mask);

    let options = Options::new().force_expose(true);
    let out = serialize(&serializer, author(), &options);
    assert_eq!(out.as_ref().and_then(|o| o.get("secret")), Some(&json!("***")));
    assert_eq!(out.as_ref().and_then(|o| o.get("name")), Some(&json!("Ann")));
}

#[test]
fn stages_can_be_skipped_per_direction() {
    let mut serializer = library();
    serializer.pipeline_mut().register(Mask);

    let author = serializer
        .deserialize(&json!({ "@type": "author", "secret": "xyz" }), &Options::new().force_expose(true))
        .unwrap();
    assert_eq!(author.get("secret"), Value::from("xyz"));
}

// -----------------------------------------------------------------------------
// Built-in scalars

static READING: Class = Class::new("Reading");

/// Records the path of every node reaching its order.
struct Witness(Arc<Mutex<Vec<String>>>);

impl Transformer for Witness {
    fn name(&self) -> &'static str {
        "witness"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(-150)
    }

    fn preflight(&self, _: &Value, ctx: &mut Context<'_>) -> bool {
        self.0.lock().unwrap().push(String::from(ctx.path()));
        false
    }
}

#[test]
fn scalars_end_the_pipeline() {
    let mut registry = Registry::new();
    registry
        .register_type(&READING, TypeDefinition::named("reading"))
        .unwrap();
    registry.register_property(&READING, "value", PropertyFragment::new().class(&NUMBER).expose());
    registry.register_property(&READING, "unit", PropertyFragment::new().class(&STRING).expose());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut serializer = Serializer::new(Arc::new(registry));
    serializer.pipeline_mut().register(Witness(seen.clone()));

    let reading = ObjectRef::of(&READING).with("value", "42").with("unit", 7);
    let out = serialize(&serializer, reading, &Options::new());
    assert_eq!(out, Some(json!({ "@type": "reading", "value": 42, "unit": "7" })));
    assert_eq!(*seen.lock().unwrap(), [String::new()]);

    seen.lock().unwrap().clear();
    let reading = serializer
        .deserialize(&json!({ "@type": "reading", "value": "5" }), &Options::new())
        .unwrap();
    assert_eq!(reading.get("value"), Value::from(5));
    assert_eq!(*seen.lock().unwrap(), [String::new()]);
}
