//! Filter compilation and evaluation.
//!
//! Filters compile before any row is read. A filter that fails to compile
//! invalidates the whole query: the executor fails closed instead of
//! running the remaining filters and showing a silently-wrong preview.

use std::cmp::Ordering;

use crate::report::{AdvancedFilter, FilterOperator};

use super::value::{compare, loose_eq, Value};
use super::{ExecError, ExecResult};

/// A validated filter ready for row evaluation.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub column: String,
    predicate: Predicate,
}

#[derive(Debug, Clone)]
enum Predicate {
    Eq(Value),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    Ordered { op: FilterOperator, bound: Value },
    Between { low: Value, high: Value },
    In(Vec<Value>),
}

/// Validate every filter of a spec up front.
pub fn compile_filters(filters: &[AdvancedFilter]) -> ExecResult<Vec<CompiledFilter>> {
    filters.iter().map(compile).collect()
}

fn compile(filter: &AdvancedFilter) -> ExecResult<CompiledFilter> {
    let value = || Value::Text(filter.value.clone());
    let predicate = match filter.operator {
        FilterOperator::Eq => Predicate::Eq(value()),
        FilterOperator::Contains => Predicate::Contains(filter.value.clone()),
        FilterOperator::StartsWith => Predicate::StartsWith(filter.value.clone()),
        FilterOperator::EndsWith => Predicate::EndsWith(filter.value.clone()),
        FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
            Predicate::Ordered {
                op: filter.operator,
                bound: value(),
            }
        }
        FilterOperator::Between => {
            let high = match filter.value_to.as_deref() {
                Some(v) if !v.is_empty() => Value::Text(v.to_string()),
                _ => {
                    return Err(ExecError::InvalidFilter {
                        column: filter.column.clone(),
                        reason: "between requires an upper bound".to_string(),
                    })
                }
            };
            Predicate::Between {
                low: value(),
                high,
            }
        }
        FilterOperator::In => {
            // Comma-delimited membership list, items trimmed.
            let items: Vec<Value> = filter
                .value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::Text(s.to_string()))
                .collect();
            if items.is_empty() {
                return Err(ExecError::InvalidFilter {
                    column: filter.column.clone(),
                    reason: "in requires at least one value".to_string(),
                });
            }
            Predicate::In(items)
        }
    };

    Ok(CompiledFilter {
        column: filter.column.clone(),
        predicate,
    })
}

impl CompiledFilter {
    /// Whether `field` satisfies this filter. Null never matches.
    pub fn matches(&self, field: &Value) -> bool {
        if field.is_null() {
            return false;
        }
        match &self.predicate {
            Predicate::Eq(v) => loose_eq(field, v),
            Predicate::Contains(s) => field.render().contains(s.as_str()),
            Predicate::StartsWith(s) => field.render().starts_with(s.as_str()),
            Predicate::EndsWith(s) => field.render().ends_with(s.as_str()),
            Predicate::Ordered { op, bound } => {
                let ord = compare(field, bound);
                match op {
                    FilterOperator::Gt => ord == Ordering::Greater,
                    FilterOperator::Gte => ord != Ordering::Less,
                    FilterOperator::Lt => ord == Ordering::Less,
                    FilterOperator::Lte => ord != Ordering::Greater,
                    _ => unreachable!("non-ordered operator in Ordered predicate"),
                }
            }
            // Inclusive on both bounds.
            Predicate::Between { low, high } => {
                compare(field, low) != Ordering::Less && compare(field, high) != Ordering::Greater
            }
            Predicate::In(items) => items.iter().any(|item| loose_eq(field, item)),
        }
    }
}
