//! Console output utilities.

use std::path::Path;

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Patreon Crawler                                   ║
║     Download media from a creator's posts             ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(creator: &str, grouping: &str, concurrency: usize, download_dir: &Path) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Creator:     {}", creator);
    println!("  Grouping:    {}", grouping);
    println!("  Concurrency: {}", concurrency);
    println!("  Directory:   {}", download_dir.display());
    println!();
}
