//! Static registry of listable resources.
//!
//! Each resource exposes a closed set of public field names. Only the
//! expressions declared here ever reach query text; caller input is matched
//! against the field names and never interpolated.

use super::error::ListError;

/// How a field compares when sorted in process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Boolean,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Public field name, as it appears in rows and in requests.
    pub field: &'static str,
    /// Storage expression the field is selected from.
    pub expression: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaListing {
    /// Folders under the media root with their file counts.
    FolderStats,
    /// Folders under the media root whose name matches no wine id.
    OrphanedFolders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceSource {
    Sql {
        from: &'static str,
        group_by: Option<&'static str>,
    },
    Media(MediaListing),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub name: &'static str,
    pub source: ResourceSource,
    /// Field used to break ordering ties so pages never overlap.
    pub key: &'static str,
    pub columns: &'static [ColumnSpec],
}

const fn col(field: &'static str, expression: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { field, expression, kind }
}

static USERS: ResourceDescriptor = ResourceDescriptor {
    name: "users",
    source: ResourceSource::Sql { from: "wine_users", group_by: None },
    key: "id",
    columns: &[
        col("id", "id", ColumnKind::Number),
        col("username", "username", ColumnKind::Text),
        col("email", "email", ColumnKind::Text),
        col("isPro", "has_proaccount", ColumnKind::Boolean),
        col("createdAt", "created_at", ColumnKind::Timestamp),
    ],
};

static WINES: ResourceDescriptor = ResourceDescriptor {
    name: "wines",
    source: ResourceSource::Sql { from: "wine_table", group_by: None },
    key: "id",
    columns: &[
        col("id", "id", ColumnKind::Number),
        col("userId", "user_id", ColumnKind::Number),
        col("name", "name", ColumnKind::Text),
        col("producer", "producer", ColumnKind::Text),
        col("grapes", "grapes", ColumnKind::Text),
        col("country", "country", ColumnKind::Text),
        col("region", "region", ColumnKind::Text),
        col("year", "year", ColumnKind::Number),
        col("price", "price", ColumnKind::Number),
        col("quantity", "quantity", ColumnKind::Number),
        col("createdAt", "created_at", ColumnKind::Timestamp),
    ],
};

static MESSAGES: ResourceDescriptor = ResourceDescriptor {
    name: "messages",
    source: ResourceSource::Sql { from: "wine_contact", group_by: None },
    key: "id",
    columns: &[
        col("id", "id", ColumnKind::Number),
        col("name", "name", ColumnKind::Text),
        col("email", "email", ColumnKind::Text),
        col("subject", "subject", ColumnKind::Text),
        col("message", "message", ColumnKind::Text),
        col("createdAt", "created_at", ColumnKind::Timestamp),
    ],
};

static USERS_WINE_COUNT: ResourceDescriptor = ResourceDescriptor {
    name: "users_wine_count",
    source: ResourceSource::Sql {
        from: "wine_users u LEFT JOIN wine_table w ON w.user_id = u.id",
        group_by: Some("u.id, u.username, u.email"),
    },
    key: "id",
    columns: &[
        col("id", "u.id", ColumnKind::Number),
        col("username", "u.username", ColumnKind::Text),
        col("email", "u.email", ColumnKind::Text),
        col("wineCount", "COUNT(w.id)", ColumnKind::Number),
    ],
};

static IMAGE_FOLDERS: ResourceDescriptor = ResourceDescriptor {
    name: "image_folders",
    source: ResourceSource::Media(MediaListing::FolderStats),
    key: "folder_name",
    columns: &[
        col("folder_name", "name", ColumnKind::Text),
        col("file_count", "file_count", ColumnKind::Number),
        col("created_at", "createdAt", ColumnKind::Timestamp),
    ],
};

static ORPHANED_IMAGE_FOLDERS: ResourceDescriptor = ResourceDescriptor {
    name: "orphaned_image_folders",
    source: ResourceSource::Media(MediaListing::OrphanedFolders),
    key: "folder_name",
    columns: &[
        col("folder_name", "name", ColumnKind::Text),
        col("created_at", "createdAt", ColumnKind::Timestamp),
    ],
};

pub static RESOURCES: &[&ResourceDescriptor] = &[
    &USERS,
    &WINES,
    &MESSAGES,
    &USERS_WINE_COUNT,
    &IMAGE_FOLDERS,
    &ORPHANED_IMAGE_FOLDERS,
];

/// Resolve a resource by its public name.
pub fn resolve(name: &str) -> Result<&'static ResourceDescriptor, ListError> {
    RESOURCES
        .iter()
        .copied()
        .find(|r| r.name == name)
        .ok_or_else(|| ListError::InvalidResource(name.to_string()))
}

/// Quote an identifier for PostgreSQL.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

impl ResourceDescriptor {
    pub fn column(&self, field: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Inner query selecting every whitelisted expression under its public
    /// name. `None` for media-backed resources.
    pub fn base_query(&self) -> Option<String> {
        let ResourceSource::Sql { from, group_by } = self.source else {
            return None;
        };

        let select = self
            .columns
            .iter()
            .map(|c| format!("{} AS {}", c.expression, quoted(c.field)))
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = format!("SELECT {} FROM {}", select, from);
        if let Some(group_by) = group_by {
            query.push_str(" GROUP BY ");
            query.push_str(group_by);
        }
        Some(query)
    }

    /// Unfiltered count over the base query.
    pub fn count_query(&self) -> Option<String> {
        self.base_query()
            .map(|base| format!("SELECT COUNT(*) AS total FROM ({}) AS rows", base))
    }
}
