use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub pro: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total_folders: i64,
    pub total_files: i64,
    pub folder_list: Vec<String>,
}

/// Dashboard summary. Every field falls back to its default when the
/// corresponding source is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub users: UserStats,
    pub images: ImageStats,
    pub wines: i64,
    pub messages: i64,
}
