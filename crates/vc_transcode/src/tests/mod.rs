//! End-to-end scenarios over small class hierarchies.

use alloc::sync::Arc;
use alloc::vec;

use serde_json::Value as JsonValue;
use vc_object::{Class, ListRef, Object, ObjectRef, Value};

use crate::registry::{PropertyFragment, Registry, TypeDefinition};
use crate::{Options, Serializer};

// -----------------------------------------------------------------------------
// Modules

mod deserialize;
mod expose;
mod pipeline;

// -----------------------------------------------------------------------------
// Library fixture

fn init_author(o: &mut Object) {
    o.set("id", 0);
    o.set("name", "");
    o.set("secret", "");
    o.set("internal", 0);
    o.set("books", ListRef::new(vec![]));
    o.set("aliasedBooks", ListRef::new(vec![]));
}

fn init_book(o: &mut Object) {
    o.set("id", 0);
    o.set("name", "");
    o.set("tag", Value::Null);
}

fn init_tag(o: &mut Object) {
    o.set("id", 0);
    o.set("tag", "");
}

static AUTHOR: Class = Class::new("Author").with_init(init_author);
static BOOK: Class = Class::new("Book").with_init(init_book);
static TAG: Class = Class::new("Tag").with_init(init_tag);

fn library_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_type(&AUTHOR, TypeDefinition::named("author").id("id"))
        .unwrap();
    registry
        .register_type(&BOOK, TypeDefinition::named("book").id("id"))
        .unwrap();
    registry
        .register_type(&TAG, TypeDefinition::named("tag").id("id"))
        .unwrap();

    registry.register_property(&AUTHOR, "name", PropertyFragment::new().expose());
    registry.register_property(&AUTHOR, "secret", PropertyFragment::new().exclude());
    registry.register_property(&AUTHOR, "books", PropertyFragment::new().array_of(&BOOK).expose());
    registry.register_property(&AUTHOR, "aliasedBooks", PropertyFragment::new().array_of(&BOOK));
    registry.register_property(&AUTHOR, "favorite", PropertyFragment::new().class(&BOOK).expose());

    registry.register_property(&BOOK, "name", PropertyFragment::new().expose());
    registry.register_property(&BOOK, "tag", PropertyFragment::new().class(&TAG).expose());

    registry.register_property(&TAG, "tag", PropertyFragment::new().expose());
    registry
}

fn library() -> Serializer {
    Serializer::new(Arc::new(library_registry()))
}

/// Ann with two books, the first tagged and also listed under an alias.
fn author() -> ObjectRef {
    let tag = ObjectRef::of(&TAG).with("id", 100).with("tag", "classic");
    let first = ObjectRef::of(&BOOK)
        .with("id", 10)
        .with("name", "First")
        .with("tag", tag);
    let second = ObjectRef::of(&BOOK)
        .with("id", 11)
        .with("name", "Second")
        .with("tag", Value::Null);

    ObjectRef::of(&AUTHOR)
        .with("id", 1)
        .with("name", "Ann")
        .with("secret", "xyz")
        .with("internal", 7)
        .with("books", vec![Value::from(first.clone()), Value::from(second)])
        .with("aliasedBooks", vec![Value::from(first)])
}

fn serialize(serializer: &Serializer, value: impl Into<Value>, options: &Options) -> Option<JsonValue> {
    serializer.serialize(&value.into(), options).unwrap()
}
