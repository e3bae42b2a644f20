//! Feed module: paging through a creator's posts.

pub mod pages;

pub use pages::{CampaignFeed, PageSource, PostStream};
