//! Media CDN integration: folder/file listings for the wine image library.

pub mod client;
pub mod error;
pub mod stats;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::ImageKitClient;
pub use error::MediaError;

/// One entry of a folder listing, file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub folder_path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Listing operations the cockpit needs from a media host.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Folders directly under `path`.
    async fn list_folders(&self, path: &str) -> Result<Vec<MediaItem>, MediaError>;

    /// Files directly under `path`, newest first when `newest_first` is set.
    async fn list_files(&self, path: &str, newest_first: bool) -> Result<Vec<MediaItem>, MediaError>;
}
