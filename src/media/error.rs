use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media host is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Invalid media URL: {0}")]
    InvalidUrl(String),

    #[error("Media host rate limit still exceeded after {0} attempts")]
    RateLimited(u32),

    #[error("Media host returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
