//! Patreon API module.
//!
//! This module provides:
//! - HTTP client for the Patreon JSON:API endpoints
//! - Response types for every entity kind the feed includes
//! - Decoding of raw pages into typed documents

pub mod client;
pub mod decode;
pub mod types;

pub use client::{find_campaign_id, PatreonApi};
pub use decode::{decode, decode_entity, Document, EntityKind, IncludedEntity};
pub use types::*;
