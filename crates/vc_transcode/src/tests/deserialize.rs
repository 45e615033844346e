use alloc::string::String;
use alloc::sync::Arc;

use serde_json::json;
use vc_object::{Class, DATE, NUMBER, Value};

use super::{AUTHOR, BOOK, TAG, library, library_registry};
use crate::error::{LinkError, RegistryError, TranscodeError};
use crate::registry::{PropertyFragment, TypeDefinition};
use crate::{Options, Serializer, Target};

static EBOOK: Class = Class::new("EBook").extends(&BOOK);
static EVENT: Class = Class::new("Event");
static UNNAMED: Class = Class::new("Unnamed");

fn catalog() -> Serializer {
    let mut registry = library_registry();
    registry
        .register_type(&EBOOK, TypeDefinition::named("ebook"))
        .unwrap();
    registry
        .register_type(&EVENT, TypeDefinition::named("event"))
        .unwrap();
    registry.register_property(&EVENT, "at", PropertyFragment::new().class(&DATE).expose());
    registry.register_property(&EVENT, "count", PropertyFragment::new().class(&NUMBER).expose());
    Serializer::new(Arc::new(registry))
}

#[test]
fn typed_graph_from_plain_data() {
    let plain = json!({
        "@type": "author",
        "id": 1,
        "name": "Ann",
        "secret": "xyz",
        "books": [
            { "@type": "book", "id": 10, "name": "First", "tag": "@/tag/100" },
            { "id": 11, "tag": 100 },
        ],
    });
    let author = library().deserialize(&plain, &Options::new()).unwrap();

    assert_eq!(author.class(), Some(&AUTHOR));
    assert_eq!(author.get("id"), Value::from(1));
    assert_eq!(author.get("name"), Value::from("Ann"));
    assert!(author.get("secret").is_undefined());

    let books = author.get("books").as_list().unwrap().to_vec();
    assert_eq!(books.len(), 2);
    for book in &books {
        assert_eq!(book.class(), Some(&BOOK));
        let tag = book.get("tag");
        assert_eq!(tag.class(), Some(&TAG));
        assert_eq!(tag.get("id"), Value::from(100));
    }
    assert_eq!(books[0].get("name"), Value::from("First"));
    assert!(books[1].get("name").is_undefined());
}

#[test]
fn discriminator_resolution() {
    let serializer = catalog();

    let ghost = serializer
        .deserialize(&json!({ "@type": "ghost", "id": 1 }), &Options::new().target(&AUTHOR))
        .unwrap();
    assert_eq!(ghost.class(), Some(&AUTHOR));

    let books = serializer
        .deserialize(
            &json!({ "@type": "author", "books": [{ "@type": "ebook", "id": 12 }] }),
            &Options::new(),
        )
        .unwrap()
        .get("books");
    let books = books.as_list().unwrap().to_vec();
    assert_eq!(books[0].class(), Some(&EBOOK));
    assert_eq!(books[0].get("id"), Value::from(12));

    let unrelated = serializer
        .deserialize(&json!({ "@type": "author" }), &Options::new().target(&BOOK))
        .unwrap();
    assert_eq!(unrelated.class(), Some(&BOOK));
}

#[test]
fn target_by_name() {
    let serializer = library();
    let book = serializer
        .deserialize(
            &json!({ "id": 3 }),
            &Options::new().target(Target::Name(String::from("book"))),
        )
        .unwrap();
    assert_eq!(book.class(), Some(&BOOK));

    let err = serializer
        .deserialize(&json!({}), &Options::new().target(Target::Name(String::from("nope"))))
        .unwrap_err();
    assert_eq!(err, TranscodeError::from(RegistryError::UnknownTypeName("nope".into())));
    assert_eq!(err.code(), 1710479570120);
}

#[test]
fn broken_links_are_errors() {
    let serializer = library();

    let err = serializer
        .deserialize(&json!({ "@type": "author", "favorite": "@/nope" }), &Options::new())
        .unwrap_err();
    assert_eq!(err, TranscodeError::from(LinkError::MalformedLink("@/nope".into())));

    let err = serializer
        .deserialize(&json!({ "@type": "author", "favorite": "@/ghost/1" }), &Options::new())
        .unwrap_err();
    assert_eq!(err, TranscodeError::from(LinkError::UnknownTypeInLink("ghost".into())));
    assert_eq!(err.code(), 1743360231473);
}

#[test]
fn initial_values_are_kept_on_request() {
    let serializer = library();
    let plain = json!({ "@type": "author", "name": "Ann" });

    let bare = serializer.deserialize(&plain, &Options::new()).unwrap();
    assert!(bare.get("secret").is_undefined());

    let kept = serializer
        .deserialize(&plain, &Options::new().keep_initial_values(true))
        .unwrap();
    assert_eq!(kept.get("secret"), Value::from(""));
    assert_eq!(kept.get("name"), Value::from("Ann"));
}

// -----------------------------------------------------------------------------
// Built-in scalars

#[test]
fn scalars_are_coerced() {
    let serializer = catalog();
    let event = serializer
        .deserialize(
            &json!({ "@type": "event", "at": "2020-01-02", "count": "42" }),
            &Options::new(),
        )
        .unwrap();
    assert!(matches!(event.get("at"), Value::Date(_)));
    assert_eq!(event.get("count"), Value::from(42));

    let out = serializer.serialize(&event, &Options::new()).unwrap();
    assert_eq!(
        out,
        Some(json!({ "@type": "event", "at": "2020-01-02T00:00:00.000Z", "count": 42 }))
    );
}

#[test]
fn type_names() {
    let serializer = catalog();
    assert_eq!(serializer.type_name(&EBOOK), Ok("ebook"));
    assert_eq!(serializer.type_by_name("event"), Ok(&EVENT));

    let err = serializer.type_name(&UNNAMED).unwrap_err();
    assert_eq!(err.code(), 1710478992800);
    assert_eq!(
        serializer.type_by_name("nope"),
        Err(RegistryError::UnknownTypeName("nope".into()))
    );
}
