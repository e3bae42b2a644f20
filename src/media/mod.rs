//! Media module for post/media representation and resolution.

pub mod item;
pub mod parser;

pub use item::{Media, Post};
pub use parser::{media_lookup, parse_media_entity, resolve_post, resolve_posts};
