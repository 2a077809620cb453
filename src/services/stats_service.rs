use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::config::MediaConfig;
use crate::database::models::{DashboardStats, ImageStats};
use crate::database::CockpitRepository;
use crate::media::{stats, MediaError, MediaHost};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub url: Option<String>,
    pub file_id: Option<String>,
}

/// Dashboard statistics and media lookups.
#[derive(Clone)]
pub struct StatsService {
    repo: CockpitRepository,
    media: Arc<dyn MediaHost>,
    media_root: String,
    media_concurrency: usize,
}

impl StatsService {
    pub fn new(repo: CockpitRepository, media: Arc<dyn MediaHost>, config: &MediaConfig) -> Self {
        Self {
            repo,
            media,
            media_root: config.root_path.clone(),
            media_concurrency: config.max_concurrency,
        }
    }

    /// All dashboard figures, fetched concurrently. A source that fails
    /// contributes its default instead of failing the whole summary.
    pub async fn dashboard(&self) -> DashboardStats {
        let (users, images, wines, messages) = tokio::join!(
            self.repo.user_stats(),
            self.image_stats(),
            self.repo.wine_count(),
            self.repo.message_count(),
        );

        DashboardStats {
            users: users.unwrap_or_else(|e| {
                warn!("User stats unavailable: {}", e);
                Default::default()
            }),
            images: images.unwrap_or_else(|e| {
                warn!("Image stats unavailable: {}", e);
                Default::default()
            }),
            wines: wines.unwrap_or_else(|e| {
                warn!("Wine count unavailable: {}", e);
                0
            }),
            messages: messages.unwrap_or_else(|e| {
                warn!("Message count unavailable: {}", e);
                0
            }),
        }
    }

    pub async fn image_stats(&self) -> Result<ImageStats, MediaError> {
        stats::image_stats(self.media.as_ref(), &self.media_root, self.media_concurrency).await
    }

    /// Photos stored for one wine, newest first.
    pub async fn photos(&self, wine_id: i64) -> Result<Vec<Photo>, MediaError> {
        let path = format!("{}/{}", self.media_root.trim_end_matches('/'), wine_id);
        let files = self.media.list_files(&path, true).await?;
        Ok(files
            .into_iter()
            .map(|file| Photo {
                url: file.url,
                file_id: file.file_id,
            })
            .collect())
    }
}
