use crate::blog::{Post, PostSlug, PostUpdate};

pub mod file;
#[cfg(test)]
pub mod memory;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("post {0:?} not found")]
    NotFound(PostSlug),
    #[error("slug {0:?} cannot be used as a storage key")]
    InvalidSlug(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed post metadata: {0}")]
    Meta(#[from] serde_json::Error),
}

/// Where posts live. Posts are created outside of the admin; it only reads
/// and updates them.
#[async_trait::async_trait]
pub trait PostStore: std::fmt::Debug + Send + Sync {
    async fn get_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// `Ok(None)` if no post has this slug.
    async fn get_post(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    async fn update_post(&self, update: PostUpdate) -> Result<Post, StoreError>;
}

pub fn is_valid_slug(slug: &str) -> bool {
    static SLUG_PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

    let slug_pattern = SLUG_PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[a-zA-Z0-9-_]+$").expect("constant pattern should parse")
    });

    slug_pattern.is_match(slug)
}
