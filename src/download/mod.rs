//! Download module for content downloading.
//!
//! This module provides:
//! - Creator crawling and scheduling
//! - Atomic media file writing
//! - Per-media reports and crawl statistics

pub mod crawl;
pub mod media;
pub mod report;
pub mod state;

pub use crawl::{CrawlEvent, CrawlOptions, Crawler, SkipReason};
pub use media::{download_media, file_extension, media_file};
pub use report::ReportEvent;
pub use state::{CrawlSummary, MediaCounters};
