use alloc::format;
use alloc::sync::Arc;

use serde_json::json;
use vc_object::{Class, Object, ObjectRef, Value};

use super::serialize;
use crate::coerce::format_number;
use crate::registry::{
    Access, AutoGroup, Converter, Conversion, Getter, PropertyFragment, Registry,
    TypeDefinition, TypeModifiers, VisibilityRule,
};
use crate::{Options, Serializer};

// -----------------------------------------------------------------------------
// Fixture

fn init_user(o: &mut Object) {
    o.set("id", 0);
    o.set("name", "");
}

static USER: Class = Class::new("User").with_init(init_user);
static PLAYER: Class = Class::new("Player").extends(&USER);
static ACCOUNT: Class = Class::new("Account");
static PROFILE: Class = Class::new("Profile");

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_type(&USER, TypeDefinition::new().id("id")).unwrap();
    registry.register_type(&PLAYER, TypeDefinition::new()).unwrap();
    registry.register_property(&USER, "name", PropertyFragment::new().expose());
    registry.register_property(
        &PLAYER,
        "sample",
        PropertyFragment::new()
            .getter(Getter::new(|player| {
                Value::from(format!("{}!", player.get("name").as_str().unwrap_or_default()))
            }))
            .expose(),
    );
    registry.register_property(
        &PLAYER,
        "publicData",
        PropertyFragment::new().rule(VisibilityRule::expose().force()),
    );

    registry
        .register_type(&ACCOUNT, TypeDefinition::named("account").id("id"))
        .unwrap();
    registry.register_property(&ACCOUNT, "login", PropertyFragment::new().expose());
    registry.register_property(
        &ACCOUNT,
        "login",
        PropertyFragment::new().rule(VisibilityRule::exclude().any(["anonymous"])),
    );
    registry.register_property(
        &ACCOUNT,
        "email",
        PropertyFragment::new().rule(VisibilityRule::expose().any(["owner", "admin"])),
    );
    registry.register_property(
        &ACCOUNT,
        "role",
        PropertyFragment::new().rule(VisibilityRule::expose().all(["admin", "audit"])),
    );
    registry.register_property(
        &ACCOUNT,
        "password",
        PropertyFragment::new().access(Access::WriteOnly).expose(),
    );
    registry.register_auto_group(
        &ACCOUNT,
        AutoGroup::new(["owner"], |account, ctx| {
            ctx.ctx_data::<u32>()
                .is_some_and(|viewer| account.get("id").as_f64() == Some(f64::from(*viewer)))
        }),
    );

    registry
        .register_type(
            &PROFILE,
            TypeDefinition::named("profile")
                .modifiers(TypeModifiers::new().default_visibility(true).exclude_prefixes(["tmp"])),
        )
        .unwrap();
    registry.register_property(&PROFILE, "bio", PropertyFragment::new().exclude());
    registry
}

fn serializer() -> Serializer {
    Serializer::new(Arc::new(registry()))
}

fn account() -> Value {
    Value::from(
        ObjectRef::of(&ACCOUNT)
            .with("id", 7)
            .with("login", "ann")
            .with("email", "ann@example.com")
            .with("role", "editor")
            .with("password", "hunter2")
            .with("_cache", 1),
    )
}

// -----------------------------------------------------------------------------
// Rules

#[test]
fn getters_and_derived_names() {
    let player = ObjectRef::of(&PLAYER).with("id", 5).with("name", "Neo");
    let out = serialize(&serializer(), player, &Options::new());
    assert_eq!(
        out,
        Some(json!({ "@type": "User/Player", "id": 5, "name": "Neo", "sample": "Neo!" }))
    );
}

#[test]
fn forcing_rule_exposes_the_whole_branch() {
    let data = ObjectRef::plain()
        .with("a", 1)
        .with("nested", ObjectRef::plain().with("b", true));
    let player = ObjectRef::of(&PLAYER)
        .with("id", 5)
        .with("name", "Neo")
        .with("publicData", data);

    let out = serialize(&serializer(), player, &Options::new());
    assert_eq!(
        out,
        Some(json!({
            "@type": "User/Player",
            "id": 5,
            "name": "Neo",
            "sample": "Neo!",
            "publicData": { "a": 1, "nested": { "b": true } },
        }))
    );
}

#[test]
fn groups_select_rules() {
    let serializer = serializer();
    let base = json!({ "@type": "account", "id": 7, "login": "ann" });

    assert_eq!(serialize(&serializer, account(), &Options::new()), Some(base));
    assert_eq!(
        serialize(&serializer, account(), &Options::new().groups(["owner"])),
        Some(json!({ "@type": "account", "id": 7, "login": "ann", "email": "ann@example.com" }))
    );
    assert_eq!(
        serialize(&serializer, account(), &Options::new().groups(["admin"])),
        Some(json!({ "@type": "account", "id": 7, "login": "ann", "email": "ann@example.com" }))
    );
    assert_eq!(
        serialize(&serializer, account(), &Options::new().groups(["audit", "admin"])),
        Some(json!({
            "@type": "account",
            "id": 7,
            "login": "ann",
            "email": "ann@example.com",
            "role": "editor",
        }))
    );
}

#[test]
fn later_rules_take_priority() {
    let out = serialize(&serializer(), account(), &Options::new().groups(["anonymous"]));
    assert_eq!(out, Some(json!({ "@type": "account", "id": 7 })));
}

#[test]
fn auto_groups_apply_from_ctx_data() {
    let serializer = serializer();
    let own = serialize(&serializer, account(), &Options::new().ctx_data(7_u32));
    assert_eq!(own.as_ref().and_then(|o| o.get("email")), Some(&json!("ann@example.com")));

    let other = serialize(&serializer, account(), &Options::new().ctx_data(8_u32));
    assert_eq!(other.as_ref().and_then(|o| o.get("email")), None);
}

#[test]
fn write_only_properties_never_serialize() {
    let out = serialize(&serializer(), account(), &Options::new().force_expose(true));
    assert_eq!(
        out,
        Some(json!({
            "@type": "account",
            "id": 7,
            "login": "ann",
            "email": "ann@example.com",
            "role": "editor",
            "_cache": 1,
        }))
    );
}

// -----------------------------------------------------------------------------
// Strategy

#[test]
fn default_visibility_option() {
    let out = serialize(&serializer(), account(), &Options::new().default_visibility(true));
    assert_eq!(
        out,
        Some(json!({
            "@type": "account",
            "id": 7,
            "login": "ann",
            "email": "ann@example.com",
            "role": "editor",
            "_cache": 1,
        }))
    );
}

#[test]
fn excluded_prefixes() {
    let options = Options::new()
        .default_visibility(true)
        .exclude_prefixes(["_"]);
    let out = serialize(&serializer(), account(), &options);
    assert_eq!(
        out,
        Some(json!({
            "@type": "account",
            "id": 7,
            "login": "ann",
            "email": "ann@example.com",
            "role": "editor",
        }))
    );

    let forced = Options::new().force_expose(true).exclude_prefixes(["_", "pass"]);
    let out = serialize(&serializer(), account(), &forced);
    assert_eq!(
        out.as_ref().and_then(|o| o.as_object()).map(|o| o.contains_key("_cache")),
        Some(false)
    );
}

#[test]
fn excluded_prefixes_leave_the_input_alone() {
    let serializer = serializer();
    let options = Options::new()
        .default_visibility(true)
        .exclude_prefixes(["_", "email"]);
    let account = account();

    let first = serialize(&serializer, account.clone(), &options);
    let second = serialize(&serializer, account.clone(), &options);
    assert_eq!(first, second);
    assert_eq!(
        first,
        Some(json!({ "@type": "account", "id": 7, "login": "ann", "role": "editor" }))
    );
    assert_eq!(account.get("_cache"), Value::from(1));
    assert_eq!(account.get("email"), Value::from("ann@example.com"));
}

#[test]
fn type_modifiers_override_options() {
    let profile = ObjectRef::of(&PROFILE)
        .with("city", "Oslo")
        .with("bio", "long text")
        .with("tmpDraft", "x");

    let out = serialize(
        &serializer(),
        profile,
        &Options::new().default_visibility(false),
    );
    assert_eq!(out, Some(json!({ "@type": "profile", "city": "Oslo" })));
}

#[test]
fn max_depth_cuts_deeper_levels() {
    let serializer = super::library();
    let options = Options::new()
        .expose_graph(crate::ExposeGraph::Deep)
        .max_depth(1);
    let out = serialize(&serializer, super::author(), &options);
    assert_eq!(
        out,
        Some(json!({
            "@type": "author",
            "id": 1,
            "name": "Ann",
            "books": [
                { "@type": "book", "id": 10 },
                { "@type": "book", "id": 11 },
            ],
        }))
    );

    let options = Options::new()
        .expose_graph(crate::ExposeGraph::Deep)
        .max_depth(0);
    let out = serialize(&serializer, super::author(), &options);
    assert_eq!(out, Some(json!({ "@type": "author", "id": 1 })));
}

// -----------------------------------------------------------------------------
// Converters

fn label_registry() -> Registry {
    let mut registry = registry();
    registry.register_property(
        &ACCOUNT,
        "label",
        PropertyFragment::new()
            .serialize_before(Converter::computed(|account, _| {
                let id = account.get("id").as_f64().unwrap_or_default();
                Value::from(format!("#{}", format_number(id)))
            }))
            .expose(),
    );
    registry.register_property(
        &ACCOUNT,
        "level",
        PropertyFragment::new()
            .serialize_before(Converter::computed_by_groups(
                ["admin"],
                |_, _| Value::from("full"),
                |_, _| Value::from("basic"),
            ))
            .expose(),
    );
    registry.register_property(
        &ACCOUNT,
        "login",
        PropertyFragment::new()
            .serialize_after(Converter::new(|value, _| {
                Conversion::pass(Value::from(value.as_str().unwrap_or_default().to_uppercase()))
            }))
            .deserialize_before(Converter::new(|value, _| {
                Conversion::pass(Value::from(value.as_str().unwrap_or_default().trim()))
            })),
    );
    registry
}

#[test]
fn computed_and_after_converters() {
    let serializer = Serializer::new(Arc::new(label_registry()));

    let out = serialize(&serializer, account(), &Options::new());
    assert_eq!(
        out,
        Some(json!({
            "@type": "account",
            "id": 7,
            "login": "ANN",
            "label": "#7",
            "level": "basic",
        }))
    );

    let out = serialize(&serializer, account(), &Options::new().groups(["admin"]));
    assert_eq!(out.as_ref().and_then(|o| o.get("level")), Some(&json!("full")));
}

#[test]
fn deserialize_converters() {
    let serializer = Serializer::new(Arc::new(label_registry()));
    let account = serializer
        .deserialize(
            &json!({ "@type": "account", "login": "  ann ", "password": "pw" }),
            &Options::new(),
        )
        .unwrap();
    assert_eq!(account.class(), Some(&ACCOUNT));
    assert_eq!(account.get("login"), Value::from("ann"));
    assert_eq!(account.get("password"), Value::from("pw"));
}
