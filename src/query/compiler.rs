//! Criteria chain → boolean query tree.
//!
//! A single pass over the chain, no intermediate state: each node compiles
//! to a fragment which lands in the root container's `should` (OR join),
//! `must_not` (negated), or `must` list. The chain itself is never mutated
//! and compiling the same chain twice yields structurally equal trees.

use tracing::debug;

use crate::criteria::{Criteria, CriteriaEntry, CriteriaNode, CriteriaValue, JoinType, OperationKey};
use crate::document::Value;
use crate::{Error, Result};

use super::{BoolQuery, Query};

/// Compile a criteria chain into a boolean query tree.
///
/// Fails with [`Error::Compilation`] on an empty field name (checked for the
/// whole chain before any clause is built) or a structurally malformed
/// operand (`BETWEEN` without a `[from, to]` pair, non-iterable `IN`).
pub fn compile(criteria: &Criteria) -> Result<BoolQuery> {
    for node in criteria.nodes() {
        if node.field.is_empty() {
            return Err(Error::compilation(
                "",
                "<chain>",
                "criteria node has an empty field name",
            ));
        }
    }

    let mut root = BoolQuery::new();
    for node in criteria.nodes() {
        let fragment = compile_node(node)?;
        if node.join == JoinType::Or {
            root.should.push(fragment);
        } else if node.negated {
            root.must_not.push(fragment);
        } else {
            root.must.push(fragment);
        }
    }

    debug!(nodes = criteria.nodes().len(), clauses = root.len(), "compiled criteria chain");
    Ok(root)
}

/// Build one node's fragment: a single compiled entry stands alone, several
/// entries wrap as `must` clauses of a fresh container, and entries with
/// absent operands drop out entirely.
fn compile_node(node: &CriteriaNode) -> Result<Query> {
    let mut clauses = Vec::with_capacity(node.entries.len());
    for entry in &node.entries {
        if let Some(clause) = compile_entry(&node.field, entry)? {
            clauses.push(clause);
        }
    }

    let mut fragment = if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        Query::Bool(BoolQuery {
            must: clauses,
            ..BoolQuery::default()
        })
    };

    if let Some(boost) = node.boost {
        fragment.set_boost(boost);
    }
    Ok(fragment)
}

fn compile_entry(field: &str, entry: &CriteriaEntry) -> Result<Option<Query>> {
    // Absent operand: no clause. Optional filter parameters pass through
    // criteria builders as nulls and are tolerated rather than rejected.
    if entry.value == CriteriaValue::Null {
        return Ok(None);
    }

    let query = match entry.key {
        OperationKey::Equals => Query::Term {
            field: field.to_owned(),
            value: scalar(field, entry)?.clone(),
            boost: None,
        },
        OperationKey::Contains => wildcard(field, format!("*{}*", scalar_text(field, entry)?)),
        OperationKey::StartsWith => wildcard(field, format!("{}*", scalar_text(field, entry)?)),
        OperationKey::EndsWith => wildcard(field, format!("*{}", scalar_text(field, entry)?)),
        OperationKey::Expression => Query::QueryString {
            field: field.to_owned(),
            query: scalar_text(field, entry)?,
            boost: None,
        },
        OperationKey::Between => {
            let (from, to) = pair(field, entry)?;
            Query::Range {
                field: field.to_owned(),
                gte: range_bound(from),
                gt: None,
                lte: range_bound(to),
                lt: None,
                boost: None,
            }
        }
        OperationKey::Fuzzy => Query::Fuzzy {
            field: field.to_owned(),
            value: scalar_text(field, entry)?,
            boost: None,
        },
        OperationKey::In => {
            let CriteriaValue::Sequence(values) = &entry.value else {
                return Err(Error::compilation(
                    field,
                    entry.key,
                    "requires an iterable value",
                ));
            };
            let mut container = BoolQuery::new();
            container.should.extend(values.iter().map(|v| Query::Term {
                field: field.to_owned(),
                value: v.clone(),
                boost: None,
            }));
            Query::Bool(container)
        }
    };
    Ok(Some(query))
}

fn wildcard(field: &str, pattern: String) -> Query {
    Query::Wildcard {
        field: field.to_owned(),
        pattern,
        boost: None,
    }
}

fn scalar<'e>(field: &str, entry: &'e CriteriaEntry) -> Result<&'e Value> {
    match &entry.value {
        CriteriaValue::Scalar(v) => Ok(v),
        _ => Err(Error::compilation(field, entry.key, "expects a scalar value")),
    }
}

fn scalar_text(field: &str, entry: &CriteriaEntry) -> Result<String> {
    Ok(scalar(field, entry)?.to_query_string())
}

/// BETWEEN operands: the `Pair` variant or, for callers assembling entries
/// by hand, a two-element sequence.
fn pair<'e>(field: &str, entry: &'e CriteriaEntry) -> Result<(&'e Value, &'e Value)> {
    match &entry.value {
        CriteriaValue::Pair(from, to) => Ok((from, to)),
        CriteriaValue::Sequence(values) if values.len() == 2 => Ok((&values[0], &values[1])),
        CriteriaValue::Sequence(values) => Err(Error::compilation(
            field,
            entry.key,
            format!("requires exactly 2 bounds, got {}", values.len()),
        )),
        _ => Err(Error::compilation(
            field,
            entry.key,
            "requires a [from, to] pair",
        )),
    }
}

/// A null bound leaves that side of the range open.
fn range_bound(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        v => Some(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_entry_has_no_wrapper() {
        let root = compile(&Criteria::field("name").is("Ada")).unwrap();
        assert_eq!(
            root.must,
            vec![Query::Term {
                field: "name".into(),
                value: Value::from("Ada"),
                boost: None,
            }]
        );
    }

    #[test]
    fn test_multi_entry_wraps_as_must() {
        let root = compile(&Criteria::field("title").starts_with("re").ends_with("ing")).unwrap();
        let Query::Bool(fragment) = &root.must[0] else {
            panic!("expected a bool fragment");
        };
        assert_eq!(fragment.must.len(), 2);
        assert_eq!(fragment.must[0], wildcard("title", "re*".into()));
        assert_eq!(fragment.must[1], wildcard("title", "*ing".into()));
    }

    #[test]
    fn test_empty_field_fails_fast() {
        let criteria = Criteria::field("ok").is(1).and(Criteria::field("").is(2));
        let err = compile(&criteria).unwrap_err();
        assert!(matches!(err, Error::Compilation { .. }));
    }

    #[test]
    fn test_between_with_open_lower_bound() {
        let root = compile(&Criteria::field("age").between(Value::Null, 10)).unwrap();
        assert_eq!(
            root.must[0],
            Query::Range {
                field: "age".into(),
                gte: None,
                gt: None,
                lte: Some(Value::Int(10)),
                lt: None,
                boost: None,
            }
        );
    }
}
