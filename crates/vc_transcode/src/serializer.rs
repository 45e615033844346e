use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::{Class, Value};

use crate::context::{Context, Direction};
use crate::error::{RegistryError, TranscodeError};
use crate::link::ObjectLinkCodec;
use crate::options::{Options, ResolvedOptions, SerializerConfig, Target};
use crate::pipeline::Pipeline;
use crate::registry::Registry;

// -----------------------------------------------------------------------------
// Serializer

/// Entry point of the transcoder.
///
/// A serializer pairs a shared [`Registry`] with a [`Pipeline`] and a
/// [`SerializerConfig`]. Every call builds its own [`Context`], so one
/// serializer serves any number of calls.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use serde_json::json;
/// use vc_object::{Class, Object, ObjectRef, Value};
/// use vc_transcode::registry::{PropertyFragment, Registry, TypeDefinition};
/// use vc_transcode::{Options, Serializer};
///
/// fn init_user(o: &mut Object) {
///     o.set("id", 0);
///     o.set("name", "");
///     o.set("password", "");
/// }
///
/// static USER: Class = Class::new("User").with_init(init_user);
///
/// let mut registry = Registry::new();
/// registry.register_type(&USER, TypeDefinition::named("user").id("id")).unwrap();
/// registry.register_property(&USER, "name", PropertyFragment::new().expose());
///
/// let serializer = Serializer::new(Arc::new(registry));
/// let user = ObjectRef::of(&USER)
///     .with("id", 1)
///     .with("name", "Ann")
///     .with("password", "secret");
///
/// let plain = serializer.serialize(&Value::from(user), &Options::new()).unwrap();
/// assert_eq!(plain, Some(json!({ "@type": "user", "id": 1, "name": "Ann" })));
///
/// let back = serializer.deserialize(&plain.unwrap(), &Options::new()).unwrap();
/// assert_eq!(back.class(), Some(&USER));
/// assert_eq!(back.get("name"), Value::from("Ann"));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer {
    registry: Arc<Registry>,
    pipeline: Pipeline,
    config: SerializerConfig,
}

impl Serializer {
    /// A serializer with the built-in pipeline and default config.
    #[inline]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, SerializerConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: SerializerConfig) -> Self {
        Self {
            registry,
            pipeline: Pipeline::new(),
            config,
        }
    }

    /// Replaces the pipeline.
    #[inline]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    #[inline]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Gives access to the pipeline, e.g. to register custom stages.
    #[inline]
    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    #[inline]
    pub fn object_links(&self) -> ObjectLinkCodec<'_> {
        ObjectLinkCodec::new(&self.registry)
    }

    // -------------------------------------------------------------------------
    // Transcoding

    fn run(
        &self,
        value: Value,
        options: &Options,
        direction: Direction,
    ) -> Result<Value, TranscodeError> {
        let resolved = ResolvedOptions::resolve(&self.config, options, &self.registry)?;
        let mut ctx = Context::new(&self.registry, &self.pipeline, &resolved, direction);
        ctx.transcode(value)
    }

    /// Serializes into JSON; `None` when the root itself is hidden.
    ///
    /// # Errors
    ///
    /// Link errors, which only arise from misconfigured types.
    pub fn serialize(
        &self,
        value: &Value,
        options: &Options,
    ) -> Result<Option<JsonValue>, TranscodeError> {
        Ok(self.serialize_value(value, options)?.to_json())
    }

    /// Serializes into a plain [`Value`] tree.
    pub fn serialize_value(&self, value: &Value, options: &Options) -> Result<Value, TranscodeError> {
        self.run(value.clone(), options, Direction::Serialize)
    }

    /// Deserializes JSON into a typed graph.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownTypeName`] if [`Options::target`] names no
    ///   registered type.
    /// - Link errors for malformed or unresolvable object links.
    pub fn deserialize(&self, plain: &JsonValue, options: &Options) -> Result<Value, TranscodeError> {
        self.deserialize_value(Value::from_json(plain), options)
    }

    /// Deserializes a plain [`Value`] tree.
    ///
    /// Objects of the input may be reused as instances and mutated.
    pub fn deserialize_value(&self, plain: Value, options: &Options) -> Result<Value, TranscodeError> {
        self.run(plain, options, Direction::Deserialize)
    }

    /// Deep-copies a graph by serializing it with everything exposed and
    /// deserializing the result.
    pub fn clone_value(&self, value: &Value) -> Result<Value, TranscodeError> {
        let plain = self.serialize_value(value, &Options::new().force_expose(true))?;
        let mut options = Options::new().force_expose(true);
        if let Some(class) = value.class().filter(|class| class.scalar_kind().is_none()) {
            options = options.target(Target::Class(class));
        }
        self.deserialize_value(plain, &options)
    }

    // -------------------------------------------------------------------------
    // Types

    /// # Errors
    ///
    /// [`RegistryError::UnknownType`] if the class has no named type.
    pub fn type_name(&self, class: &'static Class) -> Result<&str, RegistryError> {
        self.registry
            .type_descriptor(class)
            .and_then(|desc| desc.name())
            .ok_or(RegistryError::UnknownType(class.ident()))
    }

    /// # Errors
    ///
    /// [`RegistryError::UnknownTypeName`] if the name is not registered.
    pub fn type_by_name(&self, name: &str) -> Result<&'static Class, RegistryError> {
        self.registry
            .type_by_name(name)
            .ok_or_else(|| RegistryError::UnknownTypeName(name.into()))
    }
}
