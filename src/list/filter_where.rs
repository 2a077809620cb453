use serde_json::Value;

use super::error::ListError;
use super::resource::{quoted, ColumnSpec, ResourceDescriptor};
use super::types::ListFilter;

/// A filter whose column has been resolved through the whitelist.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: &'static ColumnSpec,
    pub needle: String,
}

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Resolve request filters against the resource. Unknown columns are
    /// rejected; empty values are dropped since they would match every row.
    pub fn resolve(
        resource: &'static ResourceDescriptor,
        filters: &[ListFilter],
    ) -> Result<Vec<FilterWhereInfo>, ListError> {
        let mut resolved = Vec::with_capacity(filters.len());
        for filter in filters {
            let column = resource.column(&filter.column).ok_or_else(|| ListError::UnknownColumn {
                resource: resource.name.to_string(),
                column: filter.column.clone(),
            })?;
            if filter.value.is_empty() {
                continue;
            }
            resolved.push(FilterWhereInfo {
                column,
                needle: filter.value.clone(),
            });
        }
        Ok(resolved)
    }

    /// Build the AND-joined predicate over the `rows` alias plus its bound values.
    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> (String, Vec<Value>) {
        let mut filter_where = Self::new(starting_param_index);
        let clause = conditions
            .iter()
            .map(|c| filter_where.build_sql_condition(c))
            .collect::<Vec<_>>()
            .join(" AND ");
        (clause, filter_where.param_values)
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let pattern = format!("%{}%", escape_like(&condition.needle));
        format!(
            "CAST(rows.{} AS TEXT) ILIKE {}",
            quoted(condition.column.field),
            self.param(Value::String(pattern))
        )
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape LIKE wildcards so the needle matches literally (backslash is the
/// default escape character in PostgreSQL).
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
