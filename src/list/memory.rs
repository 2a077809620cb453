//! In-process evaluation of a [`Filter`] for resources that do not live in the
//! database. Semantics follow the SQL path: case-insensitive substring
//! filters, NULLs last when ascending, key tie-break, offset/limit slicing.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::filter::Filter;
use super::filter_where::FilterWhereInfo;
use super::resource::ColumnKind;
use super::types::{ListRequest, ListResponse, SortDirection};

pub type Row = Map<String, Value>;

pub fn apply(filter: &Filter, request: &ListRequest, rows: Vec<Row>) -> ListResponse {
    let mut matched: Vec<Row> = rows
        .into_iter()
        .filter(|row| filter.conditions().iter().all(|c| matches(row, c)))
        .collect();

    let resource = filter.resource();
    let key_kind = resource
        .column(resource.key)
        .map(|c| c.kind)
        .unwrap_or(ColumnKind::Text);

    matched.sort_by(|a, b| {
        let primary = match filter.order() {
            Some(order) => {
                let field = order.column.field;
                let ordering = compare(a.get(field), b.get(field), order.column.kind);
                match order.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
            None => Ordering::Equal,
        };
        primary.then_with(|| compare(a.get(resource.key), b.get(resource.key), key_kind))
    });

    let total = matched.len() as i64;
    let data = matched
        .into_iter()
        .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(filter.limit()).unwrap_or(usize::MAX))
        .map(Value::Object)
        .collect();

    ListResponse {
        data,
        total,
        page: request.page,
        page_size: request.page_size,
    }
}

fn matches(row: &Row, condition: &FilterWhereInfo) -> bool {
    match row.get(condition.column.field).and_then(render) {
        Some(text) => text.to_lowercase().contains(&condition.needle.to_lowercase()),
        None => false,
    }
}

/// Textual rendering of a value, `None` for NULL.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>, kind: ColumnKind) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (kind, a, b) {
            (ColumnKind::Number, Value::Number(x), Value::Number(y)) => {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (ColumnKind::Boolean, Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => render(a).cmp(&render(b)),
        },
    }
}
