//! Textual object references of the form `@/TypeName/id`.

use alloc::format;
use alloc::string::String;

use vc_object::{Class, NUMBER, Value};

use crate::coerce;
use crate::error::LinkError;
use crate::registry::{Registry, TypeDescriptor, TypeHint};

/// Prefix of every object link.
pub const LINK_PREFIX: &str = "@/";

/// A parsed object link.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLink {
    pub class: &'static Class,
    pub id: Value,
}

/// Builds and parses object links against a registry.
///
/// # Examples
///
/// ```
/// use vc_object::{Class, Object, ObjectRef, Value};
/// use vc_transcode::link::ObjectLinkCodec;
/// use vc_transcode::registry::{Registry, TypeDefinition};
///
/// fn init_book(o: &mut Object) {
///     o.set("id", 0);
/// }
///
/// static BOOK: Class = Class::new("Book").with_init(init_book);
///
/// let mut registry = Registry::new();
/// registry.register_type(&BOOK, TypeDefinition::named("book").id("id")).unwrap();
///
/// let codec = ObjectLinkCodec::new(&registry);
/// let book = Value::from(ObjectRef::of(&BOOK).with("id", 8));
/// assert_eq!(codec.build(&book, None, false).unwrap().as_deref(), Some("@/book/8"));
///
/// let link = codec.parse("@/book/8").unwrap();
/// assert_eq!(link.class, &BOOK);
/// assert_eq!(link.id, Value::from(8));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectLinkCodec<'a> {
    registry: &'a Registry,
}

impl<'a> ObjectLinkCodec<'a> {
    #[inline]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Builds the link of an object.
    ///
    /// Without an explicit descriptor the one of the value's class is used.
    /// A missing id yields `Ok(None)` when `allow_blank` is set.
    ///
    /// # Errors
    ///
    /// - [`LinkError::UnnamedType`] if no named descriptor applies.
    /// - [`LinkError::NoIdProperty`] if the type has no id property.
    /// - [`LinkError::MissingId`] if the id is absent and blanks are not allowed.
    pub fn build(
        &self,
        value: &Value,
        descriptor: Option<&TypeDescriptor>,
        allow_blank: bool,
    ) -> Result<Option<String>, LinkError> {
        let descriptor = match descriptor {
            Some(descriptor) => descriptor,
            None => value
                .class()
                .and_then(|class| self.registry.type_descriptor(class))
                .ok_or(LinkError::UnnamedType)?,
        };
        let name = descriptor.name().ok_or(LinkError::UnnamedType)?;
        let id_key = descriptor
            .id_property()
            .ok_or_else(|| LinkError::NoIdProperty(String::from(name)))?;
        self.format(name, &value.get(id_key), allow_blank)
    }

    /// Builds the link of a bare id of the described type.
    pub fn build_id(
        &self,
        id: &Value,
        descriptor: &TypeDescriptor,
        allow_blank: bool,
    ) -> Result<Option<String>, LinkError> {
        let name = descriptor.name().ok_or(LinkError::UnnamedType)?;
        self.format(name, id, allow_blank)
    }

    fn format(&self, name: &str, id: &Value, allow_blank: bool) -> Result<Option<String>, LinkError> {
        match coerce::to_string(id).filter(|_| !id.is_nullish()) {
            Some(id) => Ok(Some(format!("{LINK_PREFIX}{name}/{id}"))),
            None if allow_blank => Ok(None),
            None => Err(LinkError::MissingId),
        }
    }

    /// Parses a link, splitting the type name from the id at the last `/`.
    ///
    /// The id is numeric when the id property is declared as a number or
    /// initialized with one; an id that does not parse as a number stays
    /// a string.
    ///
    /// # Errors
    ///
    /// - [`LinkError::MalformedLink`] without the `@/` prefix or a `/`
    ///   separating name and id.
    /// - [`LinkError::UnknownTypeInLink`] if the name is not registered.
    /// - [`LinkError::NoIdProperty`] if the type has no id property.
    pub fn parse(&self, link: &str) -> Result<ObjectLink, LinkError> {
        let (name, raw_id) = link
            .strip_prefix(LINK_PREFIX)
            .and_then(|rest| rest.rsplit_once('/'))
            .ok_or_else(|| LinkError::MalformedLink(String::from(link)))?;

        let class = self
            .registry
            .type_by_name(name)
            .ok_or_else(|| LinkError::UnknownTypeInLink(String::from(name)))?;
        let id_key = self
            .registry
            .type_descriptor(class)
            .and_then(TypeDescriptor::id_property)
            .ok_or_else(|| LinkError::NoIdProperty(String::from(name)))?;

        Ok(ObjectLink {
            class,
            id: self.coerce_id(class, id_key, Value::from(raw_id)),
        })
    }

    /// Coerces a raw id to the declared scalar type of the id property.
    pub fn coerce_id(&self, class: &'static Class, id_key: &str, raw: Value) -> Value {
        let numeric = match self.registry.property_descriptor(Some(class), id_key).type_hint {
            TypeHint::Class(hint) => hint == &NUMBER,
            TypeHint::Auto => matches!(class.instantiate(true).get(id_key), Value::Number(_)),
            TypeHint::ArrayOf(_) | TypeHint::MapOf(_) => false,
        };
        if !numeric {
            return match raw {
                Value::String(_) => raw,
                other => coerce::to_string(&other).map_or(other, Value::from),
            };
        }
        match coerce::to_number(&raw) {
            Some(n) => Value::from(n),
            None => {
                log::debug!("id `{raw:?}` of `{}` is not numeric", class.ident());
                raw
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
