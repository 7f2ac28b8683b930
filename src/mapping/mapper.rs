//! Entity mapper — typed objects in and out of documents.
//!
//! The mapper is descriptor-driven: only fields named by the schema move in
//! either direction. Serialization honors the `writable` flag as a hard
//! invariant; deserialization ignores unknown document keys so schema drift
//! in the store never breaks reads.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::convert::{ConverterRegistry, PropertyValueConverter};
use crate::document::{Document, Value};
use crate::mapping::{EntitySchema, PropertyDescriptor};
use crate::{Error, Result};

/// Identifier access on a domain type, standing in for reflective field
/// access. Auto-generated identifiers exist only in the store's response,
/// so they are written back onto the instance after deserialization.
pub trait Identifiable {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
}

/// Serializes entities into documents and back, consulting descriptors for
/// field visibility and the converter framework for per-property transforms.
///
/// The mapper holds no per-call state; one instance may serve concurrent
/// calls over different inputs.
#[derive(Debug, Clone)]
pub struct EntityMapper {
    registry: Arc<ConverterRegistry>,
}

impl EntityMapper {
    pub fn new(registry: Arc<ConverterRegistry>) -> Self {
        Self { registry }
    }

    /// Turn an entity into a document. Fields are emitted in descriptor
    /// order under their stored names; read-only descriptors are skipped,
    /// as are fields whose value is null or absent.
    pub fn serialize<T: Serialize>(&self, entity: &T, schema: &EntitySchema) -> Result<Document> {
        let mut fields = match serde_json::to_value(entity) {
            Ok(serde_json::Value::Object(fields)) => fields,
            Ok(other) => {
                return Err(mapping_error::<T>(
                    "entity did not serialize to an object",
                    Some(other.to_string()),
                    None,
                ));
            }
            Err(e) => return Err(mapping_error::<T>("serialization failed", None, Some(e))),
        };

        let mut doc = Document::new();
        for descriptor in schema.properties() {
            if !descriptor.writable {
                trace!(property = %descriptor.logical_name, "skipping read-only property");
                continue;
            }
            let Some(raw) = fields.remove(&descriptor.logical_name) else {
                continue;
            };
            if raw.is_null() {
                continue;
            }
            let value = self.apply_write(descriptor, Value::from(raw))?;
            doc.insert(descriptor.stored_name.clone(), value);
        }

        debug!(
            entity = schema.type_name(),
            fields = doc.len(),
            "serialized entity"
        );
        Ok(doc)
    }

    /// Turn a document into an entity. Unknown document keys are ignored;
    /// stored fragments pass through the property's converter before the
    /// typed value is assembled.
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        doc: &Document,
        schema: &EntitySchema,
    ) -> Result<T> {
        let mut fields = serde_json::Map::new();
        for descriptor in schema.properties() {
            let Some(stored) = doc.get(&descriptor.stored_name) else {
                continue;
            };
            let value = self.apply_read(descriptor, stored)?;
            fields.insert(descriptor.logical_name.clone(), value.into());
        }

        debug!(
            entity = schema.type_name(),
            fields = fields.len(),
            "deserializing entity"
        );
        let json = serde_json::Value::Object(fields);
        T::deserialize(&json).map_err(|e| {
            mapping_error::<T>("deserialization failed", Some(json.to_string()), Some(e))
        })
    }

    /// Assign a store-provided identifier onto the entity if its identifier
    /// field is currently unset. Call after every hit is turned into an
    /// object.
    pub fn backfill_identifier<E: Identifiable>(&self, entity: &mut E, id: &str) {
        if entity.id().is_none_or(str::is_empty) {
            entity.set_id(id.to_owned());
        }
    }

    /// Descriptor-attached converter first, then the registry by logical name.
    fn converter_for(
        &self,
        descriptor: &PropertyDescriptor,
    ) -> Option<Arc<dyn PropertyValueConverter>> {
        descriptor
            .converter
            .clone()
            .or_else(|| self.registry.get(&descriptor.logical_name))
    }

    fn apply_write(&self, descriptor: &PropertyDescriptor, value: Value) -> Result<Value> {
        match self.converter_for(descriptor) {
            Some(converter) => converter.write(&descriptor.logical_name, &value),
            None => Ok(value),
        }
    }

    fn apply_read(&self, descriptor: &PropertyDescriptor, value: &Value) -> Result<Value> {
        match self.converter_for(descriptor) {
            Some(converter) => converter.read(&descriptor.logical_name, value),
            None => Ok(value.clone()),
        }
    }
}

fn mapping_error<T>(message: &str, value: Option<String>, source: Option<serde_json::Error>) -> Error {
    Error::Mapping {
        type_name: std::any::type_name::<T>().to_owned(),
        message: match &source {
            Some(e) => format!("{message}: {e}"),
            None => message.to_owned(),
        },
        value,
        source,
    }
}
