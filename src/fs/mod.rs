//! Filesystem module.
//!
//! Provides:
//! - Filename sanitization
//! - Output directory layout

pub mod naming;
pub mod paths;

pub use naming::{sanitize_filename, MAX_FILENAME_LENGTH};
pub use paths::{get_creator_folder, get_download_path};
