//! Post and media representation.

use chrono::{DateTime, Utc};

/// A downloadable media item attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Unique media ID.
    pub id: String,

    /// Download URL.
    pub download_url: String,

    /// MIME type of the media ("type/subtype").
    pub mime_type: String,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

/// A post from the creator's feed with its media resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,

    /// Whether the current session may view the post's content.
    pub visible: bool,

    /// Media in the order the creator arranged them.
    pub media: Vec<Media>,
}

impl Post {
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}
