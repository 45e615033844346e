use core::fmt;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use indexmap::{IndexMap, IndexSet};
use vc_object::Class;

use crate::error::RegistryError;
use crate::hash::HashMap;
use crate::registry::{
    Access, AutoGroup, Converters, Getter, PropertyDescriptor, PropertyFragment,
    PropertyModifiers, TypeDefinition, TypeDescriptor, TypeHint, TypeModifiers, VisibilityRule,
};

// -----------------------------------------------------------------------------
// Registry

/// Catalog of type and property metadata.
///
/// Registration takes `&mut self` and happens before any traversal. Lookups
/// take `&self`; merged property descriptors and property key lists are
/// cached per class behind locks, so a registry can be shared through an
/// `Arc` by concurrent traversals.
///
/// # Examples
///
/// ```
/// use vc_object::{Class, Object};
/// use vc_transcode::registry::{PropertyFragment, Registry, TypeDefinition};
///
/// fn init_user(o: &mut Object) {
///     o.set("id", 1);
///     o.set("name", "guest");
/// }
///
/// static USER: Class = Class::new("User").with_init(init_user);
/// static ADMIN: Class = Class::new("Admin").extends(&USER);
///
/// let mut registry = Registry::new();
/// registry.register_type(&USER, TypeDefinition::new().id("id")).unwrap();
/// registry.register_type(&ADMIN, TypeDefinition::new()).unwrap();
/// registry.register_property(&ADMIN, "level", PropertyFragment::new().expose());
///
/// assert_eq!(registry.type_descriptor(&ADMIN).unwrap().name(), Some("User/Admin"));
/// assert_eq!(registry.type_by_name("User/Admin"), Some(&ADMIN));
/// assert_eq!(&*registry.all_property_keys(&ADMIN), ["id", "name", "level"]);
/// ```
pub struct Registry {
    types: HashMap<&'static Class, TypeDescriptor>,
    names: HashMap<String, &'static Class>,
    properties: HashMap<&'static Class, IndexMap<String, PropertyFragment>>,
    key_cache: RwLock<HashMap<&'static Class, Arc<[String]>>>,
    descriptor_cache: RwLock<HashMap<&'static Class, HashMap<String, Arc<PropertyDescriptor>>>>,
    empty: Arc<PropertyDescriptor>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Registry")
            .field("types", &names)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    /// See [`Registry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::default(),
            names: HashMap::default(),
            properties: HashMap::default(),
            key_cache: RwLock::new(HashMap::default()),
            descriptor_cache: RwLock::new(HashMap::default()),
            empty: Arc::new(PropertyDescriptor::default()),
        }
    }

    // -------------------------------------------------------------------------
    // Types

    /// Registers a class as a named type.
    ///
    /// Without an explicit name the nearest named ancestor's name and the
    /// class identifier are joined with `/`, e.g. `User/Admin`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateType`] if the name is already taken.
    pub fn register_type(
        &mut self,
        class: &'static Class,
        definition: TypeDefinition,
    ) -> Result<(), RegistryError> {
        let name = match definition.name {
            Some(name) => name,
            None => self.derive_name(class),
        };

        if self.names.contains_key(name.as_str()) {
            return Err(RegistryError::DuplicateType(name));
        }

        let descriptor = self.ensure_type(class);
        let previous = descriptor.name.replace(name.clone());
        if definition.id_property.is_some() {
            descriptor.id_property = definition.id_property;
        }
        if let Some(modifiers) = definition.modifiers {
            descriptor.modifiers = modifiers;
        }
        let id_property = descriptor.id_property.clone();

        if let Some(previous) = previous {
            self.names.remove(previous.as_str());
        }
        log::trace!("registered type `{name}` for class `{}`", class.ident());
        self.names.insert(name, class);

        if let Some(key) = id_property {
            self.ensure_id_property(class, key);
        }
        self.invalidate(class);
        Ok(())
    }

    /// Declares the property acting as unique identity.
    pub fn register_id_property(&mut self, class: &'static Class, key: impl Into<String>) {
        let key = key.into();
        self.ensure_type(class).id_property = Some(key.clone());
        self.ensure_id_property(class, key);
        self.invalidate(class);
    }

    /// Appends an auto-group entry.
    pub fn register_auto_group(&mut self, class: &'static Class, auto_group: AutoGroup) {
        self.ensure_type(class).auto_groups.push(auto_group);
    }

    /// Replaces the type modifiers.
    pub fn register_type_modifiers(&mut self, class: &'static Class, modifiers: TypeModifiers) {
        self.ensure_type(class).modifiers = modifiers;
    }

    fn derive_name(&self, class: &'static Class) -> String {
        let parent_name = class
            .chain()
            .skip(1)
            .find_map(|ancestor| self.types.get(&ancestor).and_then(TypeDescriptor::name));

        match parent_name {
            Some(parent) => alloc::format!("{parent}/{}", class.ident()),
            None => String::from(class.ident()),
        }
    }

    /// Returns the descriptor, seeding it from the nearest registered ancestor.
    fn ensure_type(&mut self, class: &'static Class) -> &mut TypeDescriptor {
        let seed = if self.types.contains_key(&class) {
            None
        } else {
            class
                .chain()
                .skip(1)
                .find_map(|ancestor| self.types.get(&ancestor))
                .map(TypeDescriptor::inherit)
        };
        self.types
            .entry(class)
            .or_insert_with(|| seed.unwrap_or_default())
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Declares metadata of a property on the class level.
    ///
    /// Repeated declarations fold field-wise; later visibility rules take
    /// priority over earlier ones.
    pub fn register_property(
        &mut self,
        class: &'static Class,
        key: impl Into<String>,
        fragment: PropertyFragment,
    ) {
        let key = key.into();
        if fragment.getter.is_some() && class.initial_keys().contains(&key) {
            log::warn!(
                "getter registered for `{}.{key}` shadows the initialized value",
                class.ident()
            );
        }
        self.ensure_property(class, key).absorb(fragment);
        self.invalidate(class);
    }

    #[inline]
    pub fn register_property_type(&mut self, class: &'static Class, key: &str, hint: TypeHint) {
        self.register_property(class, key, PropertyFragment::new().hint(hint));
    }

    #[inline]
    pub fn register_property_rule(
        &mut self,
        class: &'static Class,
        key: &str,
        rule: VisibilityRule,
    ) {
        self.register_property(class, key, PropertyFragment::new().rule(rule));
    }

    #[inline]
    pub fn register_property_converters(
        &mut self,
        class: &'static Class,
        key: &str,
        converters: Converters,
    ) {
        let fragment = PropertyFragment {
            converters,
            ..PropertyFragment::default()
        };
        self.register_property(class, key, fragment);
    }

    #[inline]
    pub fn register_property_modifiers(
        &mut self,
        class: &'static Class,
        key: &str,
        modifiers: PropertyModifiers,
    ) {
        self.register_property(class, key, PropertyFragment::new().modifiers(modifiers));
    }

    #[inline]
    pub fn register_property_access(&mut self, class: &'static Class, key: &str, access: Access) {
        self.register_property(class, key, PropertyFragment::new().access(access));
    }

    #[inline]
    pub fn register_property_getter(&mut self, class: &'static Class, key: &str, getter: Getter) {
        self.register_property(class, key, PropertyFragment::new().getter(getter));
    }

    fn ensure_property(&mut self, class: &'static Class, key: String) -> &mut PropertyFragment {
        self.properties
            .entry(class)
            .or_default()
            .entry(key)
            .or_default()
    }

    /// Id properties are exposed unless declared otherwise.
    fn ensure_id_property(&mut self, class: &'static Class, key: String) {
        let fragment = self.ensure_property(class, key);
        if fragment.visibility_rules.is_empty() {
            fragment.visibility_rules.push(VisibilityRule::expose());
        }
    }

    /// Drops cached lookups of `class` and of cached subclasses.
    fn invalidate(&mut self, class: &'static Class) {
        self.key_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|cached, _| !cached.is_a(class));
        self.descriptor_cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|cached, _| !cached.is_a(class));
    }

    // -------------------------------------------------------------------------
    // Lookups

    /// Returns the descriptor registered for exactly this class.
    #[inline]
    pub fn type_descriptor(&self, class: &'static Class) -> Option<&TypeDescriptor> {
        self.types.get(&class)
    }

    /// Resolves a type name to its class.
    #[inline]
    pub fn type_by_name(&self, name: &str) -> Option<&'static Class> {
        self.names.get(name).copied()
    }

    /// Iterates registered classes and their descriptors.
    #[inline]
    pub fn types(&self) -> impl Iterator<Item = (&'static Class, &TypeDescriptor)> {
        self.types.iter().map(|(class, descriptor)| (*class, descriptor))
    }

    /// Keys of all properties known for the class.
    ///
    /// Keys assigned by the initializers come first, followed by keys
    /// registered along the chain, base first.
    pub fn all_property_keys(&self, class: &'static Class) -> Arc<[String]> {
        if let Some(keys) = self
            .key_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
        {
            return Arc::clone(keys);
        }

        let mut keys: IndexSet<String> = class.initial_keys().into_iter().collect();
        let chain: Vec<&'static Class> = class.chain().collect();
        for level in chain.into_iter().rev() {
            if let Some(props) = self.properties.get(&level) {
                keys.extend(props.keys().cloned());
            }
        }
        let keys: Arc<[String]> = keys.into_iter().collect();

        self.key_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class, Arc::clone(&keys));
        keys
    }

    /// Effective descriptor of a property, merged from most-base to
    /// most-derived class.
    ///
    /// Unknown properties and plain objects share an empty descriptor.
    pub fn property_descriptor(
        &self,
        class: Option<&'static Class>,
        key: &str,
    ) -> Arc<PropertyDescriptor> {
        let Some(class) = class else {
            return Arc::clone(&self.empty);
        };

        if let Some(descriptor) = self
            .descriptor_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
            .and_then(|props| props.get(key))
        {
            return Arc::clone(descriptor);
        }

        let chain: Vec<&'static Class> = class.chain().collect();
        let mut merged: Option<PropertyDescriptor> = None;
        for level in chain.into_iter().rev() {
            if let Some(fragment) = self.properties.get(&level).and_then(|p| p.get(key)) {
                merged.get_or_insert_with(PropertyDescriptor::default).apply(fragment);
            }
        }
        let descriptor = merged.map_or_else(|| Arc::clone(&self.empty), Arc::new);

        self.descriptor_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(class)
            .or_default()
            .insert(String::from(key), Arc::clone(&descriptor));
        descriptor
    }
}

// -----------------------------------------------------------------------------
// Tests
