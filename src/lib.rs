//! Patreon Crawler - download the media attached to a creator's posts.
//!
//! This library walks a creator's paginated post feed and downloads every
//! attached media file into a local directory.
//!
//! # Features
//!
//! - Cursor-based feed enumeration, fetched page by page on demand
//! - Typed decoding of the heterogeneous `included` table
//! - Bounded-concurrency downloads that stop on the first failure
//! - Crash-safe writes through a temporary file and an atomic rename
//! - Resumable runs: files already on disk are skipped
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use patreon_crawler::{Config, CrawlOptions, Crawler, PatreonApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = PatreonApi::new(
//!         config.my_account.cookie.clone(),
//!         &config.my_account.user_agent,
//!         config.request_timeout(),
//!     )?;
//!
//!     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!     tokio::spawn(async move {
//!         while let Some(event) = rx.recv().await {
//!             println!("{:?}", event);
//!         }
//!     });
//!
//!     let crawler = Crawler::new(api, CrawlOptions::from_config(&config)?);
//!     let summary = crawler.crawl_creator("somecreator", &tx).await?;
//!     println!("{} media downloaded", summary.media_success);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod feed;
pub mod fs;
pub mod media;
pub mod output;
pub mod queue;

#[cfg(test)]
pub mod test_support;

// Re-exports for convenience
pub use api::PatreonApi;
pub use config::{Config, GroupingStrategy};
pub use download::{CrawlEvent, CrawlOptions, CrawlSummary, Crawler, ReportEvent};
pub use error::{Error, Result};
pub use feed::{PageSource, PostStream};
pub use media::{Media, Post};
pub use queue::Queue;
