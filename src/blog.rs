use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub type PostSlug = String;
pub type SessionID = String;

pub const SESSION_ID_BYTES: usize = 32;
pub const SESSION_COOKIE: &str = "__session";

pub const ADMIN_ROUTE: &str = "/posts/admin";

pub const GLOBAL_MESSAGE_KEY: &str = "globalMessage";
pub const UPDATED_MESSAGE: &str = "Successfully updated post";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update post";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub slug: PostSlug,
    pub title: String,
    pub markdown: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The fields an editor submission may change. `slug` selects the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub slug: PostSlug,
    pub markdown: String,
}

pub fn get_random_hex_string<const LEN: usize>() -> String {
    let mut bytes = [0u8; LEN];
    rand_chacha::ChaCha20Rng::from_entropy().fill_bytes(&mut bytes);

    bytes.iter().fold(String::new(), |mut output, b| {
        let _ = write!(output, "{b:02x}");
        output
    })
}

/// Path to the editor page for `slug`, percent-encoded for use in links.
pub fn editor_path(slug: &str) -> String {
    format!("{ADMIN_ROUTE}/{}", urlencoding::encode(slug))
}
