//! # Boolean Query Tree
//!
//! The structural target the criteria compiler emits into: a tree of
//! must/should/must_not containers over leaf clauses, equivalent to the
//! search engine's boolean query DSL. The tree is pure data; `to_json`
//! renders the engine's JSON form.

pub mod compiler;

use serde::{Serialize, Serializer};
use serde_json::json;

use crate::document::Value;

pub use compiler::compile;

// ============================================================================
// Query tree
// ============================================================================

/// A clause in the boolean query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Bool(BoolQuery),
    /// Exact match: `field = value`.
    Term {
        field: String,
        value: Value,
        boost: Option<f32>,
    },
    /// Wildcard match over an analyzed field.
    Wildcard {
        field: String,
        pattern: String,
        boost: Option<f32>,
    },
    /// Raw query-string expression scoped to a field.
    QueryString {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// Range with independently optional bounds.
    Range {
        field: String,
        gte: Option<Value>,
        gt: Option<Value>,
        lte: Option<Value>,
        lt: Option<Value>,
        boost: Option<f32>,
    },
    /// Fuzzy string match.
    Fuzzy {
        field: String,
        value: String,
        boost: Option<f32>,
    },
}

/// A must/should/must_not container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub must_not: Vec<Query>,
    pub boost: Option<f32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Total number of clauses across the three occurrence lists.
    pub fn len(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }
}

impl Query {
    /// Apply a boost to this clause. Every clause type in this tree
    /// supports boosting.
    pub fn set_boost(&mut self, value: f32) {
        match self {
            Query::Bool(b) => b.boost = Some(value),
            Query::Term { boost, .. }
            | Query::Wildcard { boost, .. }
            | Query::QueryString { boost, .. }
            | Query::Range { boost, .. }
            | Query::Fuzzy { boost, .. } => *boost = Some(value),
        }
    }

    /// Render the search engine's JSON DSL form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Query::Bool(b) => b.to_json(),
            Query::Term { field, value, boost } => {
                let mut body = json!({ "value": serde_json::Value::from(value.clone()) });
                put_boost(&mut body, *boost);
                json!({ "term": { (field.as_str()): body } })
            }
            Query::Wildcard { field, pattern, boost } => {
                let mut body = json!({ "value": pattern });
                put_boost(&mut body, *boost);
                json!({ "wildcard": { (field.as_str()): body } })
            }
            Query::QueryString { field, query, boost } => {
                let mut body = json!({ "query": query, "fields": [field] });
                put_boost(&mut body, *boost);
                json!({ "query_string": body })
            }
            Query::Range { field, gte, gt, lte, lt, boost } => {
                let mut body = json!({});
                for (key, bound) in [("gte", gte), ("gt", gt), ("lte", lte), ("lt", lt)] {
                    if let Some(v) = bound {
                        body[key] = serde_json::Value::from(v.clone());
                    }
                }
                put_boost(&mut body, *boost);
                json!({ "range": { (field.as_str()): body } })
            }
            Query::Fuzzy { field, value, boost } => {
                let mut body = json!({ "value": value });
                put_boost(&mut body, *boost);
                json!({ "fuzzy": { (field.as_str()): body } })
            }
        }
    }
}

impl BoolQuery {
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = json!({});
        for (key, clauses) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ] {
            if !clauses.is_empty() {
                body[key] = clauses.iter().map(Query::to_json).collect();
            }
        }
        put_boost(&mut body, self.boost);
        json!({ "bool": body })
    }
}

fn put_boost(body: &mut serde_json::Value, boost: Option<f32>) {
    if let Some(b) = boost {
        body["boost"] = json!(b);
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for BoolQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
