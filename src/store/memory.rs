use super::{PostStore, StoreError};
use crate::blog::{Post, PostSlug, PostUpdate};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<BTreeMap<PostSlug, Post>>,
    updates: AtomicUsize,
    fail_updates: bool,
}

impl MemoryStore {
    /// Seeds the store with `(slug, title, markdown)` triples.
    pub fn with_posts<'a>(
        posts: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> MemoryStore {
        let posts = posts
            .into_iter()
            .map(|(slug, title, markdown)| {
                (
                    slug.to_owned(),
                    Post {
                        slug: slug.to_owned(),
                        title: title.to_owned(),
                        markdown: markdown.to_owned(),
                        updated_at: chrono::Utc::now(),
                    },
                )
            })
            .collect();

        MemoryStore {
            posts: RwLock::new(posts),
            ..MemoryStore::default()
        }
    }

    /// A store whose updates always fail.
    pub fn failing(self) -> MemoryStore {
        MemoryStore {
            fail_updates: true,
            ..self
        }
    }

    /// Number of `update_post` calls, including failed ones.
    pub fn update_attempts(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn get_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.values().cloned().collect())
    }

    async fn get_post(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(slug).cloned())
    }

    async fn update_post(&self, update: PostUpdate) -> Result<Post, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }

        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(&update.slug) else {
            return Err(StoreError::NotFound(update.slug));
        };
        post.title = update.title;
        post.markdown = update.markdown;
        post.updated_at = chrono::Utc::now();

        Ok(post.clone())
    }
}
