//! Statistics reporting.

use console::style;

use crate::download::CrawlSummary;

/// Print statistics for a finished crawl.
pub fn print_crawl_summary(creator: &str, summary: &CrawlSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style(format!("Statistics for {}:", creator)).bold());
    println!("  Posts crawled:    {}", summary.crawled);
    println!("  Posts downloaded: {}", summary.downloaded);
    println!("  Media found:      {}", summary.discovered);
    println!("  Downloaded: {}", style(summary.media_success).green());
    println!("  Skipped:    {}", style(summary.media_skipped).yellow());
    if summary.media_failed > 0 {
        println!("  Failed:     {}", style(summary.media_failed).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}
