//! # Criteria
//!
//! The logical filter chain built by application code and consumed by the
//! query compiler. A chain is an ordered list of nodes; each node carries a
//! field, a set of operation entries, its join type, a negation flag, and an
//! optional boost. Chains are pure data — building one performs no
//! validation beyond what the type system enforces; structural checks happen
//! at compile time in [`query::compile`](crate::query::compile).
//!
//! ```rust
//! use searchmap_rs::Criteria;
//!
//! let criteria = Criteria::field("title")
//!     .contains("graph")
//!     .and(Criteria::field("year").between(2020, 2024))
//!     .or(Criteria::field("tag").in_values(["db", "search"]));
//! ```

use std::fmt;

use smallvec::{smallvec, SmallVec};

use crate::document::Value;

// ============================================================================
// Chain data model
// ============================================================================

/// How a node connects to the chain's root container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    And,
    Or,
}

/// The closed set of field operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKey {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Expression,
    Between,
    Fuzzy,
    In,
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKey::Equals => "EQUALS",
            OperationKey::Contains => "CONTAINS",
            OperationKey::StartsWith => "STARTS_WITH",
            OperationKey::EndsWith => "ENDS_WITH",
            OperationKey::Expression => "EXPRESSION",
            OperationKey::Between => "BETWEEN",
            OperationKey::Fuzzy => "FUZZY",
            OperationKey::In => "IN",
        };
        f.write_str(name)
    }
}

/// Operand of a criteria entry, tagged by shape so arity checks happen once
/// in the compiler instead of through scattered runtime casts.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    /// Absent operand. Compiles to no clause.
    Null,
    Scalar(Value),
    /// Ordered `[from, to]` pair (BETWEEN).
    Pair(Value, Value),
    Sequence(Vec<Value>),
}

impl CriteriaValue {
    fn scalar(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => CriteriaValue::Null,
            v => CriteriaValue::Scalar(v),
        }
    }
}

/// One field predicate group in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaNode {
    pub field: String,
    pub entries: SmallVec<[CriteriaEntry; 2]>,
    pub join: JoinType,
    pub negated: bool,
    pub boost: Option<f32>,
}

impl CriteriaNode {
    fn new(field: impl Into<String>, join: JoinType) -> Self {
        Self {
            field: field.into(),
            entries: smallvec![],
            join,
            negated: false,
            boost: None,
        }
    }
}

/// A single operation applied to a node's field.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaEntry {
    pub key: OperationKey,
    pub value: CriteriaValue,
}

// ============================================================================
// Fluent builder
// ============================================================================

/// An ordered chain of [`CriteriaNode`]s with a fluent builder API.
///
/// Operation methods (`is`, `contains`, `between`, …) attach an entry to the
/// most recently added node; `and`/`or` append further nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    nodes: Vec<CriteriaNode>,
}

impl Criteria {
    /// Start a chain with one node for the given field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![CriteriaNode::new(name, JoinType::And)],
        }
    }

    /// Build a chain directly from nodes, for callers assembling criteria
    /// outside the fluent API.
    pub fn from_nodes(nodes: Vec<CriteriaNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[CriteriaNode] {
        &self.nodes
    }

    // `from_nodes` can produce a node-less chain, so operation and modifier
    // methods on such a chain are no-ops rather than panics.
    fn current(&mut self) -> Option<&mut CriteriaNode> {
        self.nodes.last_mut()
    }

    fn entry(mut self, key: OperationKey, value: CriteriaValue) -> Self {
        if let Some(node) = self.current() {
            node.entries.push(CriteriaEntry { key, value });
        }
        self
    }

    // --- operations on the current node ---

    /// Exact match.
    pub fn is(self, value: impl Into<Value>) -> Self {
        self.entry(OperationKey::Equals, CriteriaValue::scalar(value))
    }

    /// Substring match (`*value*`).
    pub fn contains(self, value: impl Into<Value>) -> Self {
        self.entry(OperationKey::Contains, CriteriaValue::scalar(value))
    }

    /// Prefix match (`value*`).
    pub fn starts_with(self, value: impl Into<Value>) -> Self {
        self.entry(OperationKey::StartsWith, CriteriaValue::scalar(value))
    }

    /// Suffix match (`*value`).
    pub fn ends_with(self, value: impl Into<Value>) -> Self {
        self.entry(OperationKey::EndsWith, CriteriaValue::scalar(value))
    }

    /// Raw query-string expression scoped to the field.
    pub fn expression(self, expression: impl Into<String>) -> Self {
        self.entry(
            OperationKey::Expression,
            CriteriaValue::scalar(expression.into()),
        )
    }

    /// Inclusive range `[from, to]`.
    pub fn between(self, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.entry(
            OperationKey::Between,
            CriteriaValue::Pair(from.into(), to.into()),
        )
    }

    /// Fuzzy string match.
    pub fn fuzzy(self, value: impl Into<Value>) -> Self {
        self.entry(OperationKey::Fuzzy, CriteriaValue::scalar(value))
    }

    /// Membership in a set of values.
    pub fn in_values<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.entry(
            OperationKey::In,
            CriteriaValue::Sequence(values.into_iter().map(Into::into).collect()),
        )
    }

    // --- node modifiers ---

    /// Negate the current node (compiles to a `must_not` clause).
    pub fn not(mut self) -> Self {
        if let Some(node) = self.current() {
            node.negated = true;
        }
        self
    }

    /// Boost the current node's compiled fragment.
    pub fn boost(mut self, boost: f32) -> Self {
        if let Some(node) = self.current() {
            node.boost = Some(boost);
        }
        self
    }

    // --- chain extension ---

    /// Append another chain, joined conjunctively.
    pub fn and(mut self, other: impl Into<Criteria>) -> Self {
        self.nodes.extend(other.into().nodes);
        self
    }

    /// Append another chain, its head joined disjunctively.
    pub fn or(mut self, other: impl Into<Criteria>) -> Self {
        let mut other = other.into();
        if let Some(head) = other.nodes.first_mut() {
            head.join = JoinType::Or;
        }
        self.nodes.extend(other.nodes);
        self
    }
}

impl From<&str> for Criteria {
    fn from(field: &str) -> Self {
        Criteria::field(field)
    }
}

impl From<String> for Criteria {
    fn from(field: String) -> Self {
        Criteria::field(field)
    }
}
