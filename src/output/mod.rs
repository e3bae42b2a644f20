//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Crawl event rendering
//! - Statistics reporting

pub mod console;
pub mod events;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
};
pub use events::EventPrinter;
pub use progress::create_item_bar;
pub use stats::print_crawl_summary;
