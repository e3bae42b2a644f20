//! Creator crawling.
//!
//! Walks a creator's post feed, applies the grouping and visibility
//! policies, and feeds one download per media item into a bounded queue.
//! Progress is reported through a channel of [`CrawlEvent`]s so that a
//! single consumer owns all output.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::PatreonApi;
use crate::config::{Config, GroupingStrategy};
use crate::download::media::download_media;
use crate::download::report::ReportEvent;
use crate::download::state::{CrawlSummary, MediaCounters};
use crate::error::{Error, Result};
use crate::feed::{CampaignFeed, PageSource, PostStream};
use crate::fs::{get_creator_folder, get_download_path};
use crate::media::Media;
use crate::queue::Queue;

/// Default downloaded/crawled fraction below which a run is flagged.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.8;

/// Policies for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Root directory; each creator gets a subdirectory.
    pub output_root: PathBuf,
    pub grouping: GroupingStrategy,
    /// Download media of posts the session cannot view.
    pub download_inaccessible: bool,
    /// Maximum number of media items to schedule.
    pub download_limit: Option<usize>,
    pub concurrency: usize,
    pub warning_threshold: f64,
    /// Stop dispatching downloads after the first failed media item.
    pub abort_on_error: bool,
}

impl CrawlOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            grouping: GroupingStrategy::None,
            download_inaccessible: false,
            download_limit: None,
            concurrency: 4,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            abort_on_error: false,
        }
    }

    /// Build crawl options from a loaded configuration.
    ///
    /// Fails with [`Error::Policy`] for an unknown grouping strategy.
    pub fn from_config(config: &Config) -> Result<Self> {
        let grouping = config.options.grouping.parse::<GroupingStrategy>()?;

        Ok(Self {
            output_root: config.download_directory(),
            grouping,
            download_inaccessible: config.options.download_inaccessible_media,
            download_limit: config.download_limit(),
            concurrency: config.options.concurrency,
            warning_threshold: config.options.warning_threshold,
            abort_on_error: config.options.abort_on_error,
        })
    }
}

/// Why a post was not scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMedia,
    Inaccessible,
    LimitReached,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMedia => write!(f, "no media"),
            SkipReason::Inaccessible => write!(f, "inaccessible"),
            SkipReason::LimitReached => write!(f, "download limit reached"),
        }
    }
}

/// Progress of a crawl.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    Started {
        creator_id: String,
        directory: PathBuf,
    },
    PostSkipped {
        title: String,
        reason: SkipReason,
    },
    PostQueued {
        title: String,
        media_count: usize,
    },
    /// Enumeration finished; `count` media items are about to be downloaded.
    Discovered {
        count: usize,
    },
    Report {
        post_title: String,
        report: ReportEvent,
    },
    NoPostsFound,
    /// Too few crawled posts were downloaded, usually a bad cookie or creator.
    LowConfidence {
        downloaded: u64,
        crawled: u64,
        fraction: f64,
    },
}

fn emit(events: &UnboundedSender<CrawlEvent>, event: CrawlEvent) {
    if events.send(event).is_err() {
        tracing::trace!("Crawl event dropped, receiver closed");
    }
}

/// Crawls creators with one API session and one set of policies.
pub struct Crawler {
    api: PatreonApi,
    options: CrawlOptions,
}

impl Crawler {
    pub fn new(api: PatreonApi, options: CrawlOptions) -> Self {
        Self { api, options }
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Download every reachable media item of a creator.
    pub async fn crawl_creator(
        &self,
        creator_id: &str,
        events: &UnboundedSender<CrawlEvent>,
    ) -> Result<CrawlSummary> {
        let creator_dir = get_creator_folder(&self.options.output_root, creator_id);

        emit(
            events,
            CrawlEvent::Started {
                creator_id: creator_id.to_string(),
                directory: creator_dir.clone(),
            },
        );

        let campaign_id = self.api.get_campaign_id(creator_id).await?;
        tracing::info!("Creator {} has campaign {}", creator_id, campaign_id);

        let feed = CampaignFeed::new(self.api.clone(), campaign_id);
        self.crawl_posts(PostStream::new(feed), &creator_dir, events)
            .await
    }

    /// Schedule the media of every eligible post, then run the downloads.
    ///
    /// An enumeration error aborts the crawl before any download starts.
    pub async fn crawl_posts<S: PageSource>(
        &self,
        mut posts: PostStream<S>,
        creator_dir: &Path,
        events: &UnboundedSender<CrawlEvent>,
    ) -> Result<CrawlSummary> {
        let queue = Queue::new();
        let counters = Arc::new(MediaCounters::new());
        let mut post_failures: Vec<Arc<AtomicBool>> = Vec::new();
        let mut summary = CrawlSummary::default();
        let mut scheduled = 0usize;

        while let Some(post) = posts.next().await {
            let post = post?;

            if !post.has_media() {
                emit(
                    events,
                    CrawlEvent::PostSkipped {
                        title: post.title,
                        reason: SkipReason::NoMedia,
                    },
                );
                continue;
            }

            let allowance = match self.options.download_limit {
                Some(limit) => limit.saturating_sub(scheduled),
                None => usize::MAX,
            };
            if allowance == 0 {
                emit(
                    events,
                    CrawlEvent::PostSkipped {
                        title: post.title,
                        reason: SkipReason::LimitReached,
                    },
                );
                continue;
            }

            summary.crawled += 1;

            if !post.visible && !self.options.download_inaccessible {
                emit(
                    events,
                    CrawlEvent::PostSkipped {
                        title: post.title,
                        reason: SkipReason::Inaccessible,
                    },
                );
                continue;
            }

            let directory = get_download_path(creator_dir, &post, self.options.grouping);
            let media: Vec<Media> = post.media.into_iter().take(allowance).collect();

            emit(
                events,
                CrawlEvent::PostQueued {
                    title: post.title.clone(),
                    media_count: media.len(),
                },
            );

            scheduled += media.len();
            let failed = Arc::new(AtomicBool::new(false));
            post_failures.push(Arc::clone(&failed));

            for item in media {
                let api = self.api.clone();
                let counters = Arc::clone(&counters);
                let failed = Arc::clone(&failed);
                let events = events.clone();
                let directory = directory.clone();
                let post_title = post.title.clone();
                let published_at = post.published_at;
                let abort_on_error = self.options.abort_on_error;

                queue.enqueue(item, move |media| async move {
                    let report = download_media(&api, &media, published_at, &directory).await;
                    counters.record(&report);
                    if report.is_error() {
                        failed.store(true, Ordering::Relaxed);
                    }

                    let failure = match &report {
                        ReportEvent::Error { detail, .. } if abort_on_error => Some(detail.clone()),
                        _ => None,
                    };

                    emit(&events, CrawlEvent::Report { post_title, report });

                    match failure {
                        Some(detail) => Err(Error::Download(detail)),
                        None => Ok(()),
                    }
                });
            }
        }

        summary.discovered = queue.len() as u64;
        tracing::info!(
            "Enumerated {} pages, {} media items to download",
            posts.pages_fetched(),
            summary.discovered
        );
        emit(
            events,
            CrawlEvent::Discovered {
                count: queue.len(),
            },
        );

        let result = queue.process_all(self.options.concurrency).await;
        summary.add_media_counts(&counters);
        result?;

        summary.downloaded = post_failures
            .iter()
            .filter(|failed| !failed.load(Ordering::Relaxed))
            .count() as u64;

        self.assess(&mut summary, events);

        Ok(summary)
    }

    /// Flag runs where suspiciously few crawled posts were downloaded.
    fn assess(&self, summary: &mut CrawlSummary, events: &UnboundedSender<CrawlEvent>) {
        match summary.download_fraction() {
            None => emit(events, CrawlEvent::NoPostsFound),
            Some(fraction) if fraction < self.options.warning_threshold => {
                summary.warning = true;
                tracing::warn!(
                    "Only {}/{} crawled posts were downloaded",
                    summary.downloaded,
                    summary.crawled
                );
                emit(
                    events,
                    CrawlEvent::LowConfidence {
                        downloaded: summary.downloaded,
                        crawled: summary.crawled,
                        fraction,
                    },
                );
            }
            Some(_) => {}
        }
    }
}
