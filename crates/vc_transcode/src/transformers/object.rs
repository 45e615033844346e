use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use indexmap::IndexSet;
use vc_object::{Class, ObjectRef, Value};

use crate::context::{Context, Direction};
use crate::error::TranscodeError;
use crate::pipeline::Transformer;
use crate::registry::PropertyDescriptor;

/// Transcodes objects property by property.
///
/// Serialized, the output is a plain object led by the type discriminator,
/// the object link and the raw id, followed by every visible property.
/// Deserialized, properties are assigned to an instance of the resolved
/// class, or to the input itself when it already is one.
///
/// The properties considered are the registered ones plus, unless the
/// type or call excludes extraneous keys, those found on the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectProperties;

const ORDER: i32 = 0;

impl ObjectProperties {
    fn keys(input: &ObjectRef, ctx: &Context<'_>, skip: &[&str]) -> IndexSet<String> {
        let class = ctx.class().filter(|class| class.scalar_kind().is_none());
        let mut keys: IndexSet<String> = match class {
            Some(class) => ctx.registry().all_property_keys(class).iter().cloned().collect(),
            None => IndexSet::new(),
        };

        let exclude_extraneous = ctx
            .type_descriptor()
            .and_then(|desc| desc.modifiers().exclude_extraneous)
            .unwrap_or(ctx.options().exclude_extraneous);
        if !exclude_extraneous || ctx.is_force_expose() {
            keys.extend(
                input
                    .keys()
                    .into_iter()
                    .filter(|key| !skip.contains(&key.as_str())),
            );
        }
        keys
    }

    fn descriptor(ctx: &Context<'_>, key: &str) -> Arc<PropertyDescriptor> {
        let class = ctx.class().filter(|class| class.scalar_kind().is_none());
        ctx.registry().property_descriptor(class, key)
    }

    /// Transcodes one property in a child frame.
    fn property(
        owner: &ObjectRef,
        key: &str,
        value: Value,
        descriptor: Arc<PropertyDescriptor>,
        ctx: &mut Context<'_>,
    ) -> Result<Value, TranscodeError> {
        if descriptor.modifiers.force_raw {
            return Ok(value);
        }
        ctx.fork(|ctx| {
            ctx.enter_property(owner, key, descriptor);
            ctx.transcode(value)
        })
    }

    fn keep_initial_values(ctx: &Context<'_>) -> bool {
        ctx.type_descriptor()
            .and_then(|desc| desc.modifiers().keep_initial_values)
            .unwrap_or(ctx.options().keep_initial_values)
    }

    fn instance_for(input: &ObjectRef, class: Option<&'static Class>, keep: bool) -> ObjectRef {
        match class {
            Some(class) if !input.class().is_some_and(|own| own.is_a(class)) => {
                class.instantiate(keep)
            }
            _ => input.clone(),
        }
    }

    /// Assigns a deserialized property, honoring the merge modifiers.
    fn assign(instance: &ObjectRef, key: String, value: Value, descriptor: &PropertyDescriptor) {
        let modifiers = descriptor.modifiers;
        match (instance.get(&key), value) {
            (Value::Object(target), Value::Object(source))
                if modifiers.object_merge && !target.ptr_eq(&source) =>
            {
                let entries: Vec<(String, Value)> = source
                    .borrow()
                    .iter()
                    .map(|(k, v)| (String::from(k), v.clone()))
                    .collect();
                let mut target = target.borrow_mut();
                for (k, v) in entries {
                    target.set(k, v);
                }
            }
            (Value::List(target), Value::List(source)) if modifiers.array_append => {
                let items = source.to_vec();
                target.borrow_mut().extend(items);
            }
            (_, value) => instance.set(key, value),
        }
    }
}

impl Transformer for ObjectProperties {
    fn name(&self) -> &'static str {
        "object"
    }

    fn order(&self, _: Direction) -> Option<i32> {
        Some(ORDER)
    }

    #[inline]
    fn preflight(&self, value: &Value, ctx: &mut Context<'_>) -> bool {
        matches!(value, Value::Object(_))
            || ctx
                .class()
                .is_some_and(|class| class.scalar_kind().is_none())
    }

    fn serialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let Value::Object(input) = value else {
            log::debug!("`{}` is not an object", ctx.path());
            ctx.stop();
            return Ok(Value::Undefined);
        };
        let options = ctx.options();
        let output = ObjectRef::plain();

        if let Some(descriptor) = ctx.type_descriptor() {
            if let Some(name) = descriptor.name() {
                output.set(options.type_key.as_str(), name);
            }
            if let Some(id_key) = descriptor.id_property() {
                if options.use_reference_links && descriptor.name().is_some() {
                    let link = ctx
                        .links()
                        .build(&Value::Object(input.clone()), Some(descriptor), true)?;
                    if let Some(link) = link {
                        output.set(options.link_key.as_str(), link);
                    }
                }
                let id = input.get(id_key);
                if !id.is_undefined() {
                    output.set(id_key, id);
                }
            }
        }

        for key in Self::keys(&input, ctx, &[]) {
            let descriptor = Self::descriptor(ctx, &key);
            if !descriptor.access.is_readable() {
                continue;
            }
            let raw = if let Some(getter) = &descriptor.getter {
                getter.get(&input)
            } else if input.contains_key(&key) {
                input.get(&key)
            } else if descriptor.converters.serialize_before.is_some() {
                Value::Undefined
            } else {
                continue;
            };

            let result = Self::property(&input, &key, raw, descriptor, ctx)?;
            if !result.is_undefined() {
                output.set(key, result);
            }
        }
        Ok(Value::from(output))
    }

    fn deserialize(&self, value: Value, ctx: &mut Context<'_>) -> Result<Value, TranscodeError> {
        let Value::Object(input) = value else {
            log::debug!("`{}` is not an object", ctx.path());
            ctx.stop();
            return Ok(Value::Undefined);
        };
        let options = ctx.options();
        let class = ctx.class().filter(|class| class.scalar_kind().is_none());
        let instance = Self::instance_for(&input, class, Self::keep_initial_values(ctx));

        let skip = [options.type_key.as_str(), options.link_key.as_str()];
        for key in Self::keys(&input, ctx, &skip) {
            if skip.contains(&key.as_str()) {
                continue;
            }
            let descriptor = Self::descriptor(ctx, &key);
            if !descriptor.access.is_writable() {
                continue;
            }
            let raw = if input.contains_key(&key) {
                input.get(&key)
            } else if descriptor.converters.deserialize_before.is_some() {
                Value::Undefined
            } else {
                continue;
            };

            let result = Self::property(&input, &key, raw, Arc::clone(&descriptor), ctx)?;
            if !result.is_undefined() {
                Self::assign(&instance, key, result, &descriptor);
            }
        }
        Ok(Value::from(instance))
    }
}

// -----------------------------------------------------------------------------
// Tests
