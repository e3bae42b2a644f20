//! Crawl state tracking.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::download::report::ReportEvent;

/// Media outcome counters shared between download workers.
#[derive(Debug, Default)]
pub struct MediaCounters {
    success: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl MediaCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished media item.
    pub fn record(&self, event: &ReportEvent) {
        let counter = match event {
            ReportEvent::Success { .. } => &self.success,
            ReportEvent::Skipped { .. } => &self.skipped,
            ReportEvent::Error { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Final statistics of one creator crawl.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    /// Media items scheduled for download.
    pub discovered: u64,

    /// Posts with at least one media item, up to the download limit.
    pub crawled: u64,

    /// Scheduled posts none of whose media failed.
    pub downloaded: u64,

    pub media_success: u64,
    pub media_skipped: u64,
    pub media_failed: u64,

    /// Set when the downloaded/crawled ratio fell below the warning threshold.
    pub warning: bool,
}

impl CrawlSummary {
    /// Copy the media outcome counters into the summary.
    pub fn add_media_counts(&mut self, counters: &MediaCounters) {
        self.media_success += counters.success();
        self.media_skipped += counters.skipped();
        self.media_failed += counters.failed();
    }

    /// Fraction of crawled posts that were downloaded.
    pub fn download_fraction(&self) -> Option<f64> {
        if self.crawled == 0 {
            return None;
        }
        Some(self.downloaded as f64 / self.crawled as f64)
    }

    /// Total media files processed.
    pub fn media_total(&self) -> u64 {
        self.media_success + self.media_skipped + self.media_failed
    }
}
