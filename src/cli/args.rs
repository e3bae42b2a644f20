//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, GroupingStrategy};

/// Patreon creator media crawler CLI.
#[derive(Parser, Debug)]
#[command(
    name = "patreon-crawler",
    version,
    about = "Download media attached to a Patreon creator's posts",
    long_about = "A CLI tool to crawl a Patreon creator's post feed and download every attached image, video, and audio file.\n\n\
                  Files that are already present are skipped, so interrupted runs can simply be restarted."
)]
pub struct Args {
    /// Creator vanity name or page URL.
    #[arg(short, long)]
    pub creator: Option<String>,

    /// Cookie header of a logged-in browser session.
    #[arg(long, env = "PATREON_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "PATREON_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// How media files are grouped into directories.
    #[arg(short, long, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Also download media of posts the session cannot view.
    #[arg(long)]
    pub download_inaccessible_media: bool,

    /// Maximum number of media files to download (0 for no limit).
    #[arg(short = 'l', long)]
    pub download_limit: Option<usize>,

    /// Number of parallel downloads.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Warn when fewer than this fraction of crawled posts were downloaded.
    #[arg(long)]
    pub warning_threshold: Option<f64>,

    /// Stop after the first failed download.
    #[arg(long)]
    pub abort_on_error: bool,

    /// Path to configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Only print errors, warnings and the final summary.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI grouping argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    /// Put every file straight into the creator directory.
    None,
    /// One subdirectory per post.
    ByPost,
}

impl From<GroupingArg> for GroupingStrategy {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::None => GroupingStrategy::None,
            GroupingArg::ByPost => GroupingStrategy::ByPost,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(creator) = &self.creator {
            config.targeted_creator.creator_id = Some(creator.clone());
        }

        if let Some(cookie) = &self.cookie {
            config.my_account.cookie = cookie.clone();
        }

        if let Some(user_agent) = &self.user_agent {
            config.my_account.user_agent = user_agent.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(grouping) = self.grouping {
            config.options.grouping = GroupingStrategy::from(grouping).to_string();
        }

        if let Some(limit) = self.download_limit {
            config.options.download_limit = limit;
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrency = concurrency;
        }

        if let Some(threshold) = self.warning_threshold {
            config.options.warning_threshold = threshold;
        }

        // Boolean flags only override when set
        if self.download_inaccessible_media {
            config.options.download_inaccessible_media = true;
        }

        if self.abort_on_error {
            config.options.abort_on_error = true;
        }
    }
}
