use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::warn;

use super::{MediaError, MediaHost, MediaItem};
use crate::database::models::ImageStats;

/// File count for one folder under the media root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderStat {
    pub folder_name: String,
    pub file_count: i64,
    pub created_at: Option<String>,
}

/// Path of a folder item, preferring the host-provided path.
pub fn folder_path(root: &str, folder: &MediaItem) -> String {
    match &folder.file_path {
        Some(path) if !path.is_empty() => path.clone(),
        _ => format!("{}/{}", root.trim_end_matches('/'), folder.name),
    }
}

/// List the folders under `root` and count the files in each, at most
/// `concurrency` listings in flight. A folder whose listing fails counts 0.
pub async fn folder_stats(
    host: &dyn MediaHost,
    root: &str,
    concurrency: usize,
) -> Result<Vec<FolderStat>, MediaError> {
    let folders = host.list_folders(root).await?;

    let stats = stream::iter(folders)
        .map(|folder| async move {
            let path = folder_path(root, &folder);
            let file_count = match host.list_files(&path, false).await {
                Ok(files) => files.len() as i64,
                Err(e) => {
                    warn!("Counting files in {} failed, reporting 0: {}", path, e);
                    0
                }
            };
            FolderStat {
                folder_name: folder.name,
                file_count,
                created_at: folder.created_at,
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(stats)
}

/// Folder count, total files across folders and the folder names.
pub async fn image_stats(host: &dyn MediaHost, root: &str, concurrency: usize) -> Result<ImageStats, MediaError> {
    let stats = folder_stats(host, root, concurrency).await?;
    Ok(ImageStats {
        total_folders: stats.len() as i64,
        total_files: stats.iter().map(|s| s.file_count).sum(),
        folder_list: stats.into_iter().map(|s| s.folder_name).collect(),
    })
}

/// Folders whose name matches no wine id.
pub fn orphaned_folders(folders: Vec<MediaItem>, wine_ids: &HashSet<String>) -> Vec<MediaItem> {
    folders
        .into_iter()
        .filter(|folder| !wine_ids.contains(&folder.name))
        .collect()
}
