//! Configuration module for the patreon-crawler.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Grouping strategy parsing
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, CreatorConfig, OptionsConfig};
pub use modes::GroupingStrategy;
pub use validation::{parse_creator_id, validate_config};
