use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;
const MAX_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Admin interface for editing blog posts.
#[derive(Debug, Parser)]
#[command(name = "blog-admin", version, about)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "BLOG_ADMIN_LISTEN", default_value = "0.0.0.0:8010")]
    pub listen: SocketAddr,

    /// Folder holding `post/<slug>/` directories.
    #[arg(long, env = "BLOG_ADMIN_STORE_PATH", default_value = "./blog-store")]
    pub store_path: PathBuf,

    /// Only origin allowed to make cross-origin requests; none if unset.
    #[arg(long, env = "BLOG_ADMIN_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// How long an unread flash message is kept, in seconds (at most a year).
    #[arg(
        long,
        env = "BLOG_ADMIN_SESSION_TTL_SECS",
        default_value_t = DEFAULT_SESSION_TTL_SECS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_TTL_SECS)
    )]
    pub session_ttl_secs: u64,

    /// Default log level; `RUST_LOG` overrides it.
    #[arg(long, env = "BLOG_ADMIN_LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::level_filters::LevelFilter,

    #[arg(long, env = "BLOG_ADMIN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_ttl_secs)
    }
}
