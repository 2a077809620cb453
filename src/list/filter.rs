use serde_json::Value;

use super::error::ListError;
use super::filter_order::{FilterOrder, FilterOrderInfo};
use super::filter_where::{FilterWhere, FilterWhereInfo};
use super::resource::ResourceDescriptor;
use super::types::{ListRequest, SqlResult};

/// A list request resolved against one resource: every column it names has
/// been checked against the whitelist.
#[derive(Debug, Clone)]
pub struct Filter {
    resource: &'static ResourceDescriptor,
    where_data: Vec<FilterWhereInfo>,
    order_data: Option<FilterOrderInfo>,
    limit: i64,
    offset: i64,
}

impl Filter {
    pub fn new(resource: &'static ResourceDescriptor, request: &ListRequest) -> Result<Self, ListError> {
        let where_data = FilterWhere::resolve(resource, &request.filters)?;
        let order_data =
            FilterOrder::validate_and_parse(resource, request.sort_by.as_deref(), request.sort_direction)?;

        Ok(Self {
            resource,
            where_data,
            order_data,
            limit: request.page_size,
            offset: request.offset(),
        })
    }

    pub fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.where_data
    }

    pub fn order(&self) -> Option<&FilterOrderInfo> {
        self.order_data.as_ref()
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Page query. Each row comes back as a single JSON object column `row`.
    pub fn to_sql(&self) -> Result<SqlResult, ListError> {
        let base = self.base_query()?;
        let (where_clause, mut params) = FilterWhere::generate(&self.where_data, 0);
        let order_clause = FilterOrder::generate(self.resource, self.order_data.as_ref());

        let limit_param = params.len() + 1;
        let offset_param = params.len() + 2;
        params.push(Value::from(self.limit));
        params.push(Value::from(self.offset));

        let query = [
            "SELECT row_to_json(rows) AS row".to_string(),
            format!("FROM ({}) AS rows", base),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            order_clause,
            format!("LIMIT ${} OFFSET ${}", limit_param, offset_param),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Count over the same filtered set, without ordering or paging.
    pub fn to_count_sql(&self) -> Result<SqlResult, ListError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0);
        let query = if where_clause.is_empty() {
            self.resource.count_query().ok_or_else(|| self.not_sql())?
        } else {
            format!("SELECT COUNT(*) AS total FROM ({}) AS rows WHERE {}", self.base_query()?, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    fn base_query(&self) -> Result<String, ListError> {
        self.resource.base_query().ok_or_else(|| self.not_sql())
    }

    fn not_sql(&self) -> ListError {
        ListError::InvalidResource(format!("{} is not backed by the database", self.resource.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::resource::resolve;
    use crate::list::types::{ListFilter, ListParams};
    use serde_json::json;

    fn request(body: serde_json::Value) -> ListRequest {
        let params: ListParams = serde_json::from_value(body).unwrap();
        ListRequest::from_params(params, 100).unwrap()
    }

    #[test]
    fn builds_page_and_count_queries() {
        let users = resolve("users").unwrap();
        let filter = Filter::new(
            users,
            &request(json!({
                "page": 3,
                "pageSize": 10,
                "sortBy": "createdAt",
                "sortDirection": "desc",
                "filters": [{ "column": "email", "value": "example" }]
            })),
        )
        .unwrap();

        let base = users.base_query().unwrap();
        let page = filter.to_sql().unwrap();
        assert_eq!(
            page.query,
            format!(
                "SELECT row_to_json(rows) AS row FROM ({}) AS rows \
                 WHERE CAST(rows.\"email\" AS TEXT) ILIKE $1 \
                 ORDER BY rows.\"createdAt\" DESC, rows.\"id\" ASC LIMIT $2 OFFSET $3",
                base
            )
        );
        assert_eq!(page.params, vec![json!("%example%"), json!(10), json!(20)]);

        let count = filter.to_count_sql().unwrap();
        assert_eq!(
            count.query,
            format!(
                "SELECT COUNT(*) AS total FROM ({}) AS rows WHERE CAST(rows.\"email\" AS TEXT) ILIKE $1",
                base
            )
        );
        assert_eq!(count.params, vec![json!("%example%")]);
    }

    #[test]
    fn unfiltered_count_matches_descriptor_count_query() {
        let wines = resolve("wines").unwrap();
        let filter = Filter::new(wines, &request(json!({ "page": 1, "pageSize": 5 }))).unwrap();

        let count = filter.to_count_sql().unwrap();
        assert_eq!(count.query, wines.count_query().unwrap());
        assert!(count.params.is_empty());

        let page = filter.to_sql().unwrap();
        assert!(page.query.ends_with("ORDER BY rows.\"id\" ASC LIMIT $1 OFFSET $2"));
        assert_eq!(page.params, vec![json!(5), json!(0)]);
    }

    #[test]
    fn filters_combine_with_and() {
        let messages = resolve("messages").unwrap();
        let mut req = request(json!({ "page": 1, "pageSize": 5 }));
        req.filters = vec![
            ListFilter { column: "email".into(), value: "a".into() },
            ListFilter { column: "subject".into(), value: "b".into() },
        ];
        let filter = Filter::new(messages, &req).unwrap();
        let count = filter.to_count_sql().unwrap();
        assert!(count.query.contains("ILIKE $1 AND CAST(rows.\"subject\" AS TEXT) ILIKE $2"));
    }

    #[test]
    fn media_resources_cannot_render_sql() {
        let folders = resolve("image_folders").unwrap();
        let filter = Filter::new(folders, &request(json!({ "page": 1, "pageSize": 5 }))).unwrap();
        assert!(filter.to_sql().is_err());
        assert!(filter.to_count_sql().is_err());
    }
}
