//! Property descriptors — the explicit metadata model driving the mapper.
//!
//! Descriptors are built by the caller (by hand or by whatever schema layer
//! sits above this crate) and handed in per mapping call. The mapper never
//! inspects types reflectively; everything it knows about an entity's fields
//! is in here.

use std::fmt;
use std::sync::Arc;

use crate::convert::PropertyValueConverter;
use crate::{Error, Result};

// ============================================================================
// Descriptor
// ============================================================================

/// Declared shape of a mapped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeHint {
    Bool,
    Integer,
    Float,
    Text,
    Date,
    Range,
    Object,
    List,
    #[default]
    Other,
}

/// Metadata for one mapped field: names, type, writability, converter.
#[derive(Clone)]
pub struct PropertyDescriptor {
    /// Field name on the domain type.
    pub logical_name: String,
    /// Field name in the stored document.
    pub stored_name: String,
    pub type_hint: TypeHint,
    /// Read-only properties never appear in serialized documents.
    pub writable: bool,
    pub converter: Option<Arc<dyn PropertyValueConverter>>,
}

impl PropertyDescriptor {
    pub fn new(logical_name: impl Into<String>, stored_name: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            stored_name: stored_name.into(),
            type_hint: TypeHint::Other,
            writable: true,
            converter: None,
        }
    }

    pub fn type_hint(mut self, hint: TypeHint) -> Self {
        self.type_hint = hint;
        self
    }

    /// Mark the property read-only (computed or store-managed).
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn converter(mut self, converter: Arc<dyn PropertyValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("logical_name", &self.logical_name)
            .field("stored_name", &self.stored_name)
            .field("type_hint", &self.type_hint)
            .field("writable", &self.writable)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

// ============================================================================
// Schema
// ============================================================================

/// The full descriptor set for one entity type.
///
/// Invariant (checked at build time): stored names are unique within the
/// schema, as are logical names.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    type_name: String,
    properties: Vec<PropertyDescriptor>,
    id_logical_name: Option<String>,
}

impl EntitySchema {
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            type_name: type_name.into(),
            properties: Vec::new(),
            id_logical_name: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn by_logical_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|d| d.logical_name == name)
    }

    pub fn by_stored_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|d| d.stored_name == name)
    }

    /// The descriptor of the identifier property, if one was declared.
    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.id_logical_name
            .as_deref()
            .and_then(|name| self.by_logical_name(name))
    }

    /// Resolve a logical field name to its stored name, falling back to the
    /// name itself for fields outside the schema.
    pub fn stored_name<'a>(&'a self, logical_name: &'a str) -> &'a str {
        self.by_logical_name(logical_name)
            .map(|d| d.stored_name.as_str())
            .unwrap_or(logical_name)
    }
}

/// Fluent schema construction; `build` enforces the uniqueness invariants.
pub struct SchemaBuilder {
    type_name: String,
    properties: Vec<PropertyDescriptor>,
    id_logical_name: Option<String>,
}

impl SchemaBuilder {
    /// Add a plain writable property.
    pub fn property(
        self,
        logical_name: impl Into<String>,
        stored_name: impl Into<String>,
    ) -> Self {
        self.descriptor(PropertyDescriptor::new(logical_name, stored_name))
    }

    /// Add a fully-configured descriptor.
    pub fn descriptor(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    /// Add the identifier property. At most one per schema.
    pub fn id_property(
        mut self,
        logical_name: impl Into<String>,
        stored_name: impl Into<String>,
    ) -> Self {
        let logical_name = logical_name.into();
        self.id_logical_name = Some(logical_name.clone());
        self.descriptor(PropertyDescriptor::new(logical_name, stored_name).type_hint(TypeHint::Text))
    }

    pub fn build(self) -> Result<EntitySchema> {
        for (i, d) in self.properties.iter().enumerate() {
            if d.stored_name.is_empty() {
                return Err(Error::Schema(format!(
                    "{}: property '{}' has an empty stored name",
                    self.type_name, d.logical_name
                )));
            }
            for earlier in &self.properties[..i] {
                if earlier.stored_name == d.stored_name {
                    return Err(Error::Schema(format!(
                        "{}: duplicate stored name '{}'",
                        self.type_name, d.stored_name
                    )));
                }
                if earlier.logical_name == d.logical_name {
                    return Err(Error::Schema(format!(
                        "{}: duplicate logical name '{}'",
                        self.type_name, d.logical_name
                    )));
                }
            }
        }
        Ok(EntitySchema {
            type_name: self.type_name,
            properties: self.properties,
            id_logical_name: self.id_logical_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let schema = EntitySchema::builder("Article")
            .id_property("id", "_id")
            .property("title", "title")
            .descriptor(PropertyDescriptor::new("score", "score").read_only())
            .build()
            .unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.by_stored_name("_id").unwrap().logical_name, "id");
        assert_eq!(schema.id_property().unwrap().stored_name, "_id");
        assert!(!schema.by_logical_name("score").unwrap().writable);
        assert_eq!(schema.stored_name("id"), "_id");
        assert_eq!(schema.stored_name("unmapped"), "unmapped");
    }

    #[test]
    fn test_stored_name_resolution() {
        let schema = EntitySchema::builder("Article")
            .property("title", "headline")
            .build()
            .unwrap();
        let mapped = schema.stored_name("title");
        let fallback = schema.stored_name("views");
        assert_eq!((mapped, fallback), ("headline", "views"));
    }

    #[test]
    fn test_duplicate_stored_name_rejected() {
        let err = EntitySchema::builder("Article")
            .property("title", "title")
            .property("headline", "title")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_empty_stored_name_rejected() {
        let err = EntitySchema::builder("Article")
            .property("title", "")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
