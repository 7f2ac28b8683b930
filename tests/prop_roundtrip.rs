//! Property-based round-trip tests for the converter framework and mapper.

use std::sync::Arc;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use searchmap_rs::{
    Bound, ConverterRegistry, EntityMapper, EntitySchema, PropertyValueConverter, Range,
    RangeConverter, Value,
};

fn bound() -> impl Strategy<Value = Bound<i64>> {
    prop_oneof![
        Just(Bound::Unbounded),
        any::<i64>().prop_map(Bound::Inclusive),
        any::<i64>().prop_map(Bound::Exclusive),
    ]
}

proptest! {
    // write -> read is identity for every bound combination, including
    // fully-unbounded ranges (which write as an empty fragment).
    #[test]
    fn range_converter_round_trips(lower in bound(), upper in bound()) {
        let converter = RangeConverter::<i64>::new();
        let range = Range::new(lower, upper);

        let typed = Value::from(serde_json::to_value(&range).unwrap());
        let fragment = converter.write("window", &typed).unwrap();
        if range == Range::unbounded() {
            prop_assert_eq!(&fragment, &Value::Object(Default::default()));
        }

        let back = converter.read("window", &fragment).unwrap();
        let back: Range<i64> = serde_json::from_value(serde_json::Value::from(back)).unwrap();
        prop_assert_eq!(back, range);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: Option<String>,
    name: String,
    count: i64,
    tags: Vec<String>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        proptest::option::of("[a-z0-9-]{1,12}"),
        "\\PC{0,24}",
        any::<i64>(),
        proptest::collection::vec("[a-z]{1,8}", 0..4),
    )
        .prop_map(|(id, name, count, tags)| Record { id, name, count, tags })
}

proptest! {
    // All-writable schema: deserialize(serialize(o)) is field-wise equal.
    #[test]
    fn entity_round_trips(entity in record()) {
        let schema = EntitySchema::builder("Record")
            .id_property("id", "_id")
            .property("name", "name")
            .property("count", "count")
            .property("tags", "tags")
            .build()
            .unwrap();
        let mapper = EntityMapper::new(Arc::new(ConverterRegistry::new()));

        let doc = mapper.serialize(&entity, &schema).unwrap();
        let back: Record = mapper.deserialize(&doc, &schema).unwrap();
        prop_assert_eq!(back, entity);
    }

    // Stored names of read-only descriptors never appear in output.
    #[test]
    fn read_only_exclusion(entity in record()) {
        let schema = EntitySchema::builder("Record")
            .property("name", "name")
            .descriptor(
                searchmap_rs::PropertyDescriptor::new("count", "count").read_only(),
            )
            .build()
            .unwrap();
        let mapper = EntityMapper::new(Arc::new(ConverterRegistry::new()));

        let doc = mapper.serialize(&entity, &schema).unwrap();
        prop_assert!(!doc.contains_key("count"));
    }
}

// Converter instances are shared: the same Arc serves interleaved reads and
// writes without drift.
#[test]
fn shared_converter_is_stateless() {
    let converter: Arc<dyn PropertyValueConverter> = Arc::new(RangeConverter::<i64>::new());
    let range = Value::from(serde_json::to_value(Range::closed(1i64, 9)).unwrap());

    let first = converter.write("w", &range).unwrap();
    let _ = converter.read("w", &first).unwrap();
    let second = converter.write("w", &range).unwrap();
    assert_eq!(first, second);
}
