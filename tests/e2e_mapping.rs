//! End-to-end tests for the entity mapper.
//!
//! Each test exercises: schema -> serialize -> document -> deserialize,
//! with converters resolved through descriptors and the registry.

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use searchmap_rs::{
    ConverterRegistry, Document, EntityMapper, EntitySchema, Error, Identifiable,
    PropertyDescriptor, PropertyValueConverter, Range, RangeConverter, Result, TypeHint, Value,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    id: Option<String>,
    title: String,
    views: i64,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published: Option<Range<NaiveDate>>,
}

impl Identifiable for Article {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

fn article() -> Article {
    Article {
        id: Some("a-1".into()),
        title: "Ada".into(),
        views: 42,
        tags: vec!["db".into(), "search".into()],
        score: None,
        published: Some(Range::closed(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )),
    }
}

fn schema() -> EntitySchema {
    EntitySchema::builder("Article")
        .id_property("id", "_id")
        .property("title", "title")
        .property("views", "view_count")
        .property("tags", "tags")
        .descriptor(PropertyDescriptor::new("score", "score").read_only())
        .descriptor(
            PropertyDescriptor::new("published", "published")
                .type_hint(TypeHint::Range)
                .converter(Arc::new(RangeConverter::<NaiveDate>::new())),
        )
        .build()
        .unwrap()
}

fn mapper() -> EntityMapper {
    EntityMapper::new(Arc::new(ConverterRegistry::new()))
}

// ============================================================================
// 1. Serialize: stored names, descriptor order, converter fragments
// ============================================================================

#[test]
fn test_serialize_document_shape() {
    let doc = mapper().serialize(&article(), &schema()).unwrap();

    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, vec!["_id", "title", "view_count", "tags", "published"]);

    assert_eq!(doc.get("view_count"), Some(&Value::Int(42)));
    let fragment = doc.get("published").unwrap().as_object().unwrap();
    assert_eq!(fragment.get("gte"), Some(&Value::from("2024-01-01")));
    assert_eq!(fragment.get("lte"), Some(&Value::from("2024-12-31")));
}

// ============================================================================
// 2. Read-only exclusion (hard invariant)
// ============================================================================

#[test]
fn test_read_only_property_never_serialized() {
    let mut entity = article();
    entity.score = Some(0.93);

    let doc = mapper().serialize(&entity, &schema()).unwrap();
    assert!(!doc.contains_key("score"));
}

// ============================================================================
// 3. Null fields are absent, not null
// ============================================================================

#[test]
fn test_null_fields_omitted() {
    let mut entity = article();
    entity.id = None;
    entity.published = None;

    let doc = mapper().serialize(&entity, &schema()).unwrap();
    assert!(!doc.contains_key("_id"));
    assert!(!doc.contains_key("published"));
}

// ============================================================================
// 4. Round-trip (all-writable schema)
// ============================================================================

#[test]
fn test_round_trip() {
    let entity = article();
    let mapper = mapper();
    let schema = schema();

    let doc = mapper.serialize(&entity, &schema).unwrap();
    let back: Article = mapper.deserialize(&doc, &schema).unwrap();
    assert_eq!(back, entity);
}

// ============================================================================
// 5. Deserialize ignores unknown keys (schema drift tolerance)
// ============================================================================

#[test]
fn test_unknown_document_keys_ignored() {
    let mapper = mapper();
    let schema = schema();
    let mut doc = mapper.serialize(&article(), &schema).unwrap();
    doc.insert("added_by_a_newer_writer", "whatever");

    let back: Article = mapper.deserialize(&doc, &schema).unwrap();
    assert_eq!(back, article());
}

// ============================================================================
// 6. Identifier back-fill
// ============================================================================

#[test]
fn test_backfill_assigns_missing_identifier() {
    let mapper = mapper();
    let mut entity = article();
    entity.id = None;

    mapper.backfill_identifier(&mut entity, "generated-7");
    assert_eq!(entity.id.as_deref(), Some("generated-7"));

    // An already-set identifier is left alone.
    mapper.backfill_identifier(&mut entity, "other");
    assert_eq!(entity.id.as_deref(), Some("generated-7"));
}

#[test]
fn test_backfill_overwrites_empty_identifier() {
    let mapper = mapper();
    let mut entity = article();
    entity.id = Some(String::new());

    mapper.backfill_identifier(&mut entity, "generated-8");
    assert_eq!(entity.id.as_deref(), Some("generated-8"));
}

// ============================================================================
// 7. Registry-resolved converters
// ============================================================================

struct Uppercase;

impl PropertyValueConverter for Uppercase {
    fn read(&self, property: &str, value: &Value) -> Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| conversion_err(property, value))?;
        Ok(Value::String(s.to_lowercase()))
    }

    fn write(&self, property: &str, value: &Value) -> Result<Value> {
        let s = value
            .as_str()
            .ok_or_else(|| conversion_err(property, value))?;
        Ok(Value::String(s.to_uppercase()))
    }
}

fn conversion_err(property: &str, value: &Value) -> Error {
    Error::Conversion {
        property: property.to_owned(),
        value: value.to_string(),
        message: "expected a string".into(),
    }
}

#[test]
fn test_registry_converter_consulted() {
    let registry = Arc::new(ConverterRegistry::new());
    registry.register("title", Arc::new(Uppercase));
    let mapper = EntityMapper::new(registry);
    let schema = schema();

    let doc = mapper.serialize(&article(), &schema).unwrap();
    assert_eq!(doc.get("title"), Some(&Value::from("ADA")));

    let back: Article = mapper.deserialize(&doc, &schema).unwrap();
    assert_eq!(back.title, "ada");
}

// ============================================================================
// 8. Error policy
// ============================================================================

#[test]
fn test_missing_required_field_is_mapping_error() {
    let mut doc = mapper().serialize(&article(), &schema()).unwrap();
    doc.remove("title");

    let err = mapper().deserialize::<Article>(&doc, &schema()).unwrap_err();
    match err {
        Error::Mapping { type_name, value, .. } => {
            assert!(type_name.contains("Article"));
            // The attempted value travels with the error.
            assert!(value.unwrap().contains("a-1"));
        }
        other => panic!("expected a mapping error, got {other}"),
    }
}

#[test]
fn test_conversion_error_propagates_unwrapped() {
    let mut doc = mapper().serialize(&article(), &schema()).unwrap();
    doc.insert("published", "not-a-fragment");

    let err = mapper().deserialize::<Article>(&doc, &schema()).unwrap_err();
    match err {
        Error::Conversion { property, .. } => assert_eq!(property, "published"),
        other => panic!("expected a conversion error, got {other}"),
    }
}

// ============================================================================
// 9. Mapper is shareable across threads
// ============================================================================

#[test]
fn test_concurrent_mapping_calls() {
    let registry = Arc::new(ConverterRegistry::new());
    registry.register("title", Arc::new(Uppercase));
    let mapper = EntityMapper::new(registry);
    let schema = Arc::new(schema());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let mapper = mapper.clone();
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                let mut entity = article();
                entity.views = i;
                let doc = mapper.serialize(&entity, &schema).unwrap();
                assert_eq!(doc.get("view_count"), Some(&Value::Int(i)));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

// ============================================================================
// 10. Documents round-trip through JSON text
// ============================================================================

#[test]
fn test_document_json_round_trip() {
    let doc = mapper().serialize(&article(), &schema()).unwrap();
    let text = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
}
