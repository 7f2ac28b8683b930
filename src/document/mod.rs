//! # Document Model
//!
//! The schemaless representation exchanged with the document store.
//! These types cross every boundary: mapper ↔ converters ↔ compiler ↔ user.
//!
//! Design rule: NO mapper types, NO criteria types here.
//! This module is pure data — no I/O, no state.

pub mod map;
pub mod value;

pub use map::Document;
pub use value::Value;
