use super::error::ListError;
use super::resource::{quoted, ColumnSpec, ResourceDescriptor};
use super::types::SortDirection;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static ColumnSpec,
    pub sort: SortDirection,
}

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve the optional sort key. Keys outside the whitelist are rejected.
    pub fn validate_and_parse(
        resource: &'static ResourceDescriptor,
        sort_by: Option<&str>,
        direction: SortDirection,
    ) -> Result<Option<FilterOrderInfo>, ListError> {
        let Some(key) = sort_by else {
            return Ok(None);
        };
        let column = resource.column(key).ok_or_else(|| ListError::UnknownSortKey {
            resource: resource.name.to_string(),
            key: key.to_string(),
        })?;
        Ok(Some(FilterOrderInfo { column, sort: direction }))
    }

    /// ORDER BY over the `rows` alias, always ending with the resource key.
    pub fn generate(resource: &ResourceDescriptor, order: Option<&FilterOrderInfo>) -> String {
        let key = format!("rows.{} ASC", quoted(resource.key));
        match order {
            Some(info) if info.column.field == resource.key => {
                format!("ORDER BY rows.{} {}", quoted(resource.key), info.sort.to_sql())
            }
            Some(info) => format!(
                "ORDER BY rows.{} {}, {}",
                quoted(info.column.field),
                info.sort.to_sql(),
                key
            ),
            None => format!("ORDER BY {}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::resource::resolve;

    #[test]
    fn defaults_to_key_order() {
        let users = resolve("users").unwrap();
        let order = FilterOrder::validate_and_parse(users, None, SortDirection::Desc).unwrap();
        assert!(order.is_none());
        assert_eq!(FilterOrder::generate(users, None), "ORDER BY rows.\"id\" ASC");
    }

    #[test]
    fn sorts_by_public_field_with_key_tiebreak() {
        let users = resolve("users").unwrap();
        let order = FilterOrder::validate_and_parse(users, Some("createdAt"), SortDirection::Desc)
            .unwrap()
            .unwrap();
        assert_eq!(
            FilterOrder::generate(users, Some(&order)),
            "ORDER BY rows.\"createdAt\" DESC, rows.\"id\" ASC"
        );
    }

    #[test]
    fn sorting_by_key_does_not_repeat_it() {
        let users = resolve("users").unwrap();
        let order = FilterOrder::validate_and_parse(users, Some("id"), SortDirection::Desc)
            .unwrap()
            .unwrap();
        assert_eq!(FilterOrder::generate(users, Some(&order)), "ORDER BY rows.\"id\" DESC");
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let users = resolve("users").unwrap();
        let err = FilterOrder::validate_and_parse(users, Some("created_at; DROP TABLE wine_users"), SortDirection::Asc)
            .unwrap_err();
        assert!(matches!(err, ListError::UnknownSortKey { .. }));
    }
}
