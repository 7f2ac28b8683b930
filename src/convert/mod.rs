//! # Property Value Converter Framework
//!
//! Per-property bidirectional transforms between a typed field value and its
//! document representation. Converters are stateless: one instance may be
//! shared across threads and invoked concurrently by multiple mapper calls.
//!
//! | Piece | Description |
//! |-------|-------------|
//! | [`PropertyValueConverter`] | The read/write contract |
//! | [`ConverterRegistry`] | Caller-owned converter lookup by logical name |
//! | [`RangeConverter`] | Generic `{gte, gt, lte, lt}` fragment converter |

pub mod range;

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::document::Value;
use crate::Result;

pub use range::{Bound, Range, RangeBound, RangeConverter};

// ============================================================================
// Converter contract
// ============================================================================

/// Bidirectional transform between a typed field value and its stored form.
///
/// Both directions are total for well-formed input and fail with
/// [`Error::Conversion`](crate::Error::Conversion) — carrying the owning
/// property's logical name and the offending value — on malformed input.
/// Implementations must not hold mutable state.
pub trait PropertyValueConverter: Send + Sync {
    /// Stored document fragment → typed value representation.
    fn read(&self, property: &str, value: &Value) -> Result<Value>;

    /// Typed value representation → stored document fragment.
    fn write(&self, property: &str, value: &Value) -> Result<Value>;
}

// ============================================================================
// Registry
// ============================================================================

/// Converter lookup keyed by a property's logical name.
///
/// Owned by the caller (typically one per mapping context) and handed to
/// [`EntityMapper`](crate::EntityMapper) by shared ownership. Registration
/// after construction is allowed, so the map sits behind a lock; reads
/// during mapping take the read side only.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: RwLock<HashMap<String, Arc<dyn PropertyValueConverter>>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a property's logical name, replacing any
    /// previous registration.
    pub fn register(
        &self,
        logical_name: impl Into<String>,
        converter: Arc<dyn PropertyValueConverter>,
    ) {
        self.converters.write().insert(logical_name.into(), converter);
    }

    pub fn get(&self, logical_name: &str) -> Option<Arc<dyn PropertyValueConverter>> {
        self.converters.read().get(logical_name).cloned()
    }

    pub fn contains(&self, logical_name: &str) -> bool {
        self.converters.read().contains_key(logical_name)
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("registered", &self.converters.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct UpperCase;

    impl PropertyValueConverter for UpperCase {
        fn read(&self, property: &str, value: &Value) -> Result<Value> {
            let s = value
                .as_str()
                .ok_or_else(|| Error::conversion(property, value, "expected a string"))?;
            Ok(Value::String(s.to_lowercase()))
        }

        fn write(&self, property: &str, value: &Value) -> Result<Value> {
            let s = value
                .as_str()
                .ok_or_else(|| Error::conversion(property, value, "expected a string"))?;
            Ok(Value::String(s.to_uppercase()))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ConverterRegistry::new();
        assert!(registry.get("code").is_none());

        registry.register("code", Arc::new(UpperCase));
        let conv = registry.get("code").unwrap();
        assert_eq!(
            conv.write("code", &Value::from("abc")).unwrap(),
            Value::from("ABC")
        );
        assert!(registry.contains("code"));
    }

    #[test]
    fn test_conversion_error_carries_property_and_value() {
        let err = UpperCase.write("code", &Value::Int(7)).unwrap_err();
        match err {
            Error::Conversion { property, value, .. } => {
                assert_eq!(property, "code");
                assert_eq!(value, "7");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
