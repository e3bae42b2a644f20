//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::GroupingStrategy;
use crate::fs::naming::sanitize_filename;
use crate::media::Post;

/// Get the base folder for a creator.
pub fn get_creator_folder(root: &Path, creator_id: &str) -> PathBuf {
    root.join(sanitize_filename(creator_id))
}

/// Get the folder a post's media is downloaded into.
pub fn get_download_path(
    creator_folder: &Path,
    post: &Post,
    grouping: GroupingStrategy,
) -> PathBuf {
    match grouping {
        GroupingStrategy::None => creator_folder.to_path_buf(),
        GroupingStrategy::ByPost => creator_folder.join(sanitize_filename(&post.title)),
    }
}
