//! # searchmap-rs — Object-Document Mapping for Search Engines
//!
//! The mapping and query-compilation core of a search-engine client stack:
//! typed domain objects in and out of schemaless JSON-like documents, and
//! logical criteria chains compiled into boolean query trees.
//!
//! ## Design Principles
//!
//! 1. **Pure transforms**: no I/O, no async, no shared mutable state —
//!    every entry point is a synchronous function of its inputs
//! 2. **Explicit metadata**: field mapping is driven by an [`EntitySchema`]
//!    built by the caller, never by ambient reflection
//! 3. **Clean DTOs**: [`Document`], [`Value`], [`Query`] cross all boundaries
//! 4. **Compiler owns nothing**: criteria chain → query tree is a pure
//!    function; the chain is never mutated
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use searchmap_rs::{Criteria, ConverterRegistry, EntityMapper, EntitySchema, compile};
//! use serde::{Deserialize, Serialize};
//!
//! # fn example() -> searchmap_rs::Result<()> {
//! #[derive(Serialize, Deserialize)]
//! struct Article { id: Option<String>, title: String }
//!
//! let schema = EntitySchema::builder("Article")
//!     .id_property("id", "_id")
//!     .property("title", "title")
//!     .build()?;
//!
//! let mapper = EntityMapper::new(Arc::new(ConverterRegistry::new()));
//! let doc = mapper.serialize(&Article { id: None, title: "Ada".into() }, &schema)?;
//!
//! let query = compile(&Criteria::field("title").contains("Ada"))?;
//! println!("{}", serde_json::to_string(&query).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Document model | `document` | Ordered maps and dynamically-typed values |
//! | Converters | `convert` | Per-property value converters + range converter |
//! | Mapper | `mapping` | Entity ↔ document, identifier back-fill |
//! | Compiler | `query` | Criteria chain → boolean query tree |

// ============================================================================
// Modules
// ============================================================================

pub mod document;
pub mod convert;
pub mod mapping;
pub mod criteria;
pub mod query;

// ============================================================================
// Re-exports: Document model (the DTOs)
// ============================================================================

pub use document::{Document, Value};

// ============================================================================
// Re-exports: Converter framework
// ============================================================================

pub use convert::{
    Bound, ConverterRegistry, PropertyValueConverter, Range, RangeBound, RangeConverter,
};

// ============================================================================
// Re-exports: Mapping
// ============================================================================

pub use mapping::{EntityMapper, EntitySchema, Identifiable, PropertyDescriptor, TypeHint};

// ============================================================================
// Re-exports: Criteria and query tree
// ============================================================================

pub use criteria::{Criteria, CriteriaEntry, CriteriaNode, CriteriaValue, JoinType, OperationKey};
pub use query::{compile, BoolQuery, Query};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A property value converter rejected a stored or typed value.
    #[error("conversion failed for property '{property}': {message} (value: {value})")]
    Conversion {
        property: String,
        value: String,
        message: String,
    },

    /// Entity serialization or deserialization failed.
    #[error("mapping failed for type {type_name}: {message}")]
    Mapping {
        type_name: String,
        message: String,
        /// Rendering of the value whose mapping was attempted, where one
        /// exists at the failure site.
        value: Option<String>,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A criteria chain was structurally invalid.
    #[error("cannot compile criteria for field '{field}' ({operation}): {message}")]
    Compilation {
        field: String,
        operation: String,
        message: String,
    },

    /// An entity schema violated a structural invariant.
    #[error("schema error: {0}")]
    Schema(String),
}

impl Error {
    pub(crate) fn conversion(
        property: impl Into<String>,
        value: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Error::Conversion {
            property: property.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn compilation(
        field: impl Into<String>,
        operation: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Error::Compilation {
            field: field.into(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
