//! Cursor-driven enumeration of a creator's posts.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::Stream;

use crate::api::{decode, PatreonApi};
use crate::error::Result;
use crate::media::{resolve_posts, Post};

/// Something that can fetch raw posts pages by cursor.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw page document for `cursor`; `None` means the first page.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<String>;
}

/// The posts feed of one campaign on the live API.
#[derive(Clone)]
pub struct CampaignFeed {
    api: PatreonApi,
    campaign_id: String,
}

impl CampaignFeed {
    pub fn new(api: PatreonApi, campaign_id: String) -> Self {
        Self { api, campaign_id }
    }

    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }
}

#[async_trait]
impl PageSource for CampaignFeed {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<String> {
        self.api.get_posts(&self.campaign_id, cursor).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
    /// The next fetch uses this cursor.
    Next(Option<String>),
    /// The last page has been fetched.
    LastPage,
    /// A page failed or the sequence was drained.
    Done,
}

/// Lazily advancing sequence of posts.
///
/// Pages are fetched one at a time, only once the posts of the previous page
/// have been consumed. A failed fetch or decode yields a single error and
/// ends the sequence. The sequence cannot be restarted.
pub struct PostStream<S> {
    source: S,
    buffer: VecDeque<Post>,
    position: Position,
    pages_fetched: usize,
}

impl<S: PageSource> PostStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            position: Position::Next(None),
            pages_fetched: 0,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Advance to the next post.
    pub async fn next(&mut self) -> Option<Result<Post>> {
        loop {
            if let Some(post) = self.buffer.pop_front() {
                return Some(Ok(post));
            }

            let cursor = match &self.position {
                Position::Next(cursor) => cursor.clone(),
                Position::LastPage => {
                    self.position = Position::Done;
                    return None;
                }
                Position::Done => return None,
            };

            if let Err(e) = self.fetch(cursor.as_deref()).await {
                tracing::debug!("Page fetch failed, ending post sequence: {}", e);
                self.position = Position::Done;
                return Some(Err(e));
            }
        }
    }

    /// Fetch, decode and resolve one page into the buffer.
    async fn fetch(&mut self, cursor: Option<&str>) -> Result<()> {
        let raw = self.source.fetch_page(cursor).await?;
        let document = decode(&raw)?;
        let posts = resolve_posts(&document)?;

        self.pages_fetched += 1;
        tracing::debug!(
            "Fetched page {} with {} posts (next cursor: {:?})",
            self.pages_fetched,
            posts.len(),
            document.next_cursor
        );

        self.buffer.extend(posts);
        self.position = match document.next_cursor {
            Some(next) => Position::Next(Some(next)),
            None => Position::LastPage,
        };

        Ok(())
    }

    /// Turn the sequence into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<Post>> {
        futures::stream::unfold(self, |mut posts| async move {
            posts.next().await.map(|item| (item, posts))
        })
    }
}
