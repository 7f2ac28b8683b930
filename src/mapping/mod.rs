//! # Entity Mapping
//!
//! Descriptor-driven serialization between domain types and [`Document`]s.
//!
//! | Piece | Description |
//! |-------|-------------|
//! | [`PropertyDescriptor`] / [`EntitySchema`] | Explicit per-field metadata |
//! | [`EntityMapper`] | serialize / deserialize / identifier back-fill |
//! | [`Identifiable`] | Identifier access on domain types |
//!
//! [`Document`]: crate::Document

pub mod descriptor;
pub mod mapper;

pub use descriptor::{EntitySchema, PropertyDescriptor, SchemaBuilder, TypeHint};
pub use mapper::{EntityMapper, Identifiable};
