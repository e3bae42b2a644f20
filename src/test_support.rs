//! Fixtures shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::feed::PageSource;

/// In-memory posts pages keyed by cursor.
#[derive(Clone, Default)]
pub struct FixturePages {
    pages: Arc<HashMap<Option<String>, String>>,
    requests: Arc<Mutex<Vec<Option<String>>>>,
}

impl FixturePages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page served for `cursor`.
    pub fn page(self, cursor: Option<&str>, body: String) -> Self {
        let mut pages = (*self.pages).clone();
        pages.insert(cursor.map(str::to_string), body);
        Self {
            pages: Arc::new(pages),
            requests: self.requests,
        }
    }

    pub fn raw_page(self, cursor: Option<&str>, body: &str) -> Self {
        self.page(cursor, body.to_string())
    }

    /// Cursors requested so far, in order.
    pub fn requests(&self) -> Vec<Option<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FixturePages {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<String> {
        let cursor = cursor.map(str::to_string);
        self.requests.lock().unwrap().push(cursor.clone());
        self.pages
            .get(&cursor)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("no fixture page for cursor {:?}", cursor)))
    }
}

/// A visible post titled after its id.
pub fn post(id: &str, media_ids: &[&str]) -> Value {
    post_with(id, &format!("Post {}", id), true, media_ids)
}

/// A post with every field under control.
pub fn post_with(id: &str, title: &str, visible: bool, media_ids: &[&str]) -> Value {
    json!({
        "type": "post",
        "id": id,
        "attributes": {
            "title": title,
            "published_at": "2024-03-01T12:00:00Z",
            "current_user_can_view": visible,
            "post_metadata": { "image_order": media_ids },
        },
    })
}

/// An included media entity.
pub fn media(id: &str, mime_type: &str, download_url: &str) -> Value {
    json!({
        "type": "media",
        "id": id,
        "attributes": {
            "mimetype": mime_type,
            "download_url": download_url,
            "metadata": { "dimensions": { "w": 100, "h": 50 } },
        },
    })
}

/// A raw posts page document.
pub fn page(posts: &[Value], included: &[Value], next_cursor: Option<&str>) -> String {
    json!({
        "data": posts,
        "included": included,
        "meta": { "pagination": { "cursors": { "next": next_cursor } } },
    })
    .to_string()
}
