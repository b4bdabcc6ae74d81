use super::{is_valid_slug, PostStore, StoreError};
use crate::blog::{Post, PostSlug, PostUpdate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const META_FILE: &str = "meta.json";
const TEXT_FILE: &str = "text.md";
const TEMP_SUFFIX_BYTES: usize = 8;

/// Posts stored as `<root>/post/<slug>/{meta.json,text.md}`. The folder name
/// is the slug; a `meta.json` naming a different slug is ignored.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct PostMeta {
    slug: PostSlug,
    title: String,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Post> for PostMeta {
    fn from(post: &Post) -> PostMeta {
        PostMeta {
            slug: post.slug.clone(),
            title: post.title.clone(),
            updated_at: post.updated_at,
        }
    }
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> FileStore {
        FileStore { root: root.into() }
    }

    fn posts_dir(&self) -> PathBuf {
        self.root.join("post")
    }

    fn post_dir(&self, slug: &str) -> PathBuf {
        self.posts_dir().join(slug)
    }

    /// `Ok(None)` if the post folder or its metadata does not exist, or the
    /// metadata belongs to another slug.
    async fn read_post(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let post_dir = self.post_dir(slug);
        let meta = match tokio::fs::read(post_dir.join(META_FILE)).await {
            Ok(it) => it,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let meta = serde_json::from_slice::<PostMeta>(&meta)?;
        if meta.slug != slug {
            tracing::warn!(
                folder = slug,
                meta_slug = %meta.slug,
                "post metadata names another slug"
            );
            return Ok(None);
        }

        let markdown = match tokio::fs::read_to_string(post_dir.join(TEXT_FILE)).await {
            Ok(it) => it,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(Post {
            slug: meta.slug,
            title: meta.title,
            markdown,
            updated_at: meta.updated_at,
        }))
    }
}

/// Swaps in new `text.md` and `meta.json` for a post. Both are staged as
/// temporary siblings and renamed into place; if `meta.json` cannot be
/// replaced, the previous text is put back so the post is left as it was.
async fn replace_post_files(
    post_dir: &Path,
    temp_suffix: &str,
    previous: &Post,
    post: &Post,
) -> Result<(), StoreError> {
    let meta = serde_json::to_vec(&PostMeta::from(post))?;
    let text_temp = post_dir.join(format!("{TEXT_FILE}.{temp_suffix}.tmp"));
    let meta_temp = post_dir.join(format!("{META_FILE}.{temp_suffix}.tmp"));

    let staged: std::io::Result<()> = async {
        tokio::fs::write(&text_temp, post.markdown.as_bytes()).await?;
        tokio::fs::write(&meta_temp, &meta).await?;
        tokio::fs::rename(&text_temp, post_dir.join(TEXT_FILE)).await
    }
    .await;
    if let Err(err) = staged {
        discard(&text_temp).await;
        discard(&meta_temp).await;
        return Err(err.into());
    }

    if let Err(err) = tokio::fs::rename(&meta_temp, post_dir.join(META_FILE)).await {
        discard(&meta_temp).await;

        let restored: std::io::Result<()> = async {
            tokio::fs::write(&text_temp, previous.markdown.as_bytes()).await?;
            tokio::fs::rename(&text_temp, post_dir.join(TEXT_FILE)).await
        }
        .await;
        if let Err(restore_err) = restored {
            discard(&text_temp).await;
            tracing::error!(
                slug = %post.slug,
                "error restoring text after failed update: {restore_err}"
            );
        }

        return Err(err.into());
    }

    Ok(())
}

async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => (),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
        Err(err) => tracing::warn!(?path, "error removing temporary file: {err}"),
    }
}

#[async_trait::async_trait]
impl PostStore for FileStore {
    async fn get_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts_dir = match tokio::fs::read_dir(self.posts_dir()).await {
            Ok(it) => it,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = ?self.posts_dir(), "post folder does not exist yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut posts = Vec::new();
        while let Some(entry) = posts_dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(slug) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if !is_valid_slug(&slug) {
                tracing::debug!(path = ?entry.path(), "skipping folder that is not a slug");
                continue;
            }

            match self.read_post(&slug).await {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {
                    tracing::debug!(path = ?entry.path(), "skipping folder without post metadata")
                }
                Err(err) => {
                    tracing::error!(path = ?entry.path(), "error reading post: {err}");
                    return Err(err);
                }
            }
        }

        posts.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(posts)
    }

    async fn get_post(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        self.read_post(slug).await
    }

    async fn update_post(&self, update: PostUpdate) -> Result<Post, StoreError> {
        if !is_valid_slug(&update.slug) {
            return Err(StoreError::InvalidSlug(update.slug));
        }

        let Some(previous) = self.read_post(&update.slug).await? else {
            return Err(StoreError::NotFound(update.slug));
        };

        let post = Post {
            slug: update.slug,
            title: update.title,
            markdown: update.markdown,
            updated_at: chrono::Utc::now(),
        };
        let temp_suffix = crate::blog::get_random_hex_string::<TEMP_SUFFIX_BYTES>();
        replace_post_files(&self.post_dir(&post.slug), &temp_suffix, &previous, &post).await?;

        tracing::info!(slug = %post.slug, "updated post");
        Ok(post)
    }
}
