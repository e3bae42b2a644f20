//! Rendering of crawl events.

use console::style;
use indicatif::ProgressBar;

use crate::download::{CrawlEvent, ReportEvent};
use crate::output::console::{print_info, print_warning};
use crate::output::progress::create_item_bar;

/// One-line description of a per-media report.
pub fn describe_report(post_title: &str, report: &ReportEvent) -> String {
    match report {
        ReportEvent::Success { media_id } => {
            format!("[downloaded] {} from `{}`", media_id, post_title)
        }
        ReportEvent::Skipped { media_id, reason } => {
            format!("[skipped] {} from `{}` ({})", media_id, post_title, reason)
        }
        ReportEvent::Error { media_id, detail } => {
            format!("[error] {} from `{}`: {}", media_id, post_title, detail)
        }
    }
}

/// Text of the low-confidence warning.
pub fn low_confidence_message(downloaded: u64, fraction: f64) -> String {
    if downloaded == 0 {
        "No posts were downloaded. Did you provide a valid cookie and creator?".to_string()
    } else {
        format!(
            "Only {:.1}% of posts were downloaded. Did you provide a valid cookie and creator?",
            fraction * 100.0
        )
    }
}

/// Prints crawl events as they arrive.
///
/// Owns the download progress bar; every line goes through it while it is
/// visible so output never tears.
pub struct EventPrinter {
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl EventPrinter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, bar: None }
    }

    pub fn handle(&mut self, event: CrawlEvent) {
        match event {
            CrawlEvent::Started {
                creator_id,
                directory,
            } => {
                print_info(&format!(
                    "Downloading posts from {} to {}",
                    creator_id,
                    directory.display()
                ));
            }
            CrawlEvent::PostSkipped { title, reason } => {
                if !self.quiet {
                    self.line(format!(
                        "{} '{}' ({})",
                        style("Skipping post").dim(),
                        title,
                        reason
                    ));
                }
            }
            CrawlEvent::PostQueued { title, media_count } => {
                if !self.quiet {
                    self.line(format!("Queued {} media from '{}'", media_count, title));
                }
            }
            CrawlEvent::Discovered { count } => {
                print_info(&format!("Discovered {} media items to download.", count));
                if !self.quiet && count > 0 {
                    self.bar = Some(create_item_bar(count as u64, "Downloading"));
                }
            }
            CrawlEvent::Report { post_title, report } => {
                let message = describe_report(&post_title, &report);
                let message = match report {
                    ReportEvent::Error { .. } => style(message).red().to_string(),
                    _ if self.quiet => String::new(),
                    _ => message,
                };
                if !message.is_empty() {
                    self.line(message);
                }
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            CrawlEvent::NoPostsFound => {
                self.finish();
                print_warning("No posts found");
            }
            CrawlEvent::LowConfidence {
                downloaded,
                fraction,
                ..
            } => {
                self.finish();
                print_warning(&low_confidence_message(downloaded, fraction));
            }
        }
    }

    /// Clear the progress bar, if any.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn line(&self, message: String) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_report() {
        assert_eq!(
            describe_report("Hello", &ReportEvent::skipped("42", "already downloaded")),
            "[skipped] 42 from `Hello` (already downloaded)"
        );
        assert_eq!(
            describe_report("Hello", &ReportEvent::error("42", "invalid mime type: image")),
            "[error] 42 from `Hello`: invalid mime type: image"
        );
    }

    #[test]
    fn test_low_confidence_message() {
        assert!(low_confidence_message(0, 0.0).starts_with("No posts were downloaded"));
        assert!(low_confidence_message(1, 0.5).starts_with("Only 50.0% of posts"));
    }
}
