//! Per-media outcome reporting.

use std::fmt;

/// Skip reason for media whose file is already on disk.
pub const ALREADY_DOWNLOADED: &str = "already downloaded";

/// Skip reason for media the API returned without a MIME type.
pub const NO_MIME_TYPE: &str = "no mime type";

/// Outcome of downloading one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Success { media_id: String },
    Skipped { media_id: String, reason: String },
    Error { media_id: String, detail: String },
}

impl ReportEvent {
    pub fn success(media_id: impl Into<String>) -> Self {
        ReportEvent::Success {
            media_id: media_id.into(),
        }
    }

    pub fn skipped(media_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportEvent::Skipped {
            media_id: media_id.into(),
            reason: reason.into(),
        }
    }

    pub fn error(media_id: impl Into<String>, detail: impl fmt::Display) -> Self {
        ReportEvent::Error {
            media_id: media_id.into(),
            detail: detail.to_string(),
        }
    }

    pub fn media_id(&self) -> &str {
        match self {
            ReportEvent::Success { media_id }
            | ReportEvent::Skipped { media_id, .. }
            | ReportEvent::Error { media_id, .. } => media_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ReportEvent::Error { .. })
    }
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEvent::Success { media_id } => write!(f, "downloaded {}", media_id),
            ReportEvent::Skipped { media_id, reason } => {
                write!(f, "skipped {} ({})", media_id, reason)
            }
            ReportEvent::Error { media_id, detail } => write!(f, "failed {}: {}", media_id, detail),
        }
    }
}
