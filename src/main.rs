//! Patreon Crawler - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use patreon_crawler::{
    api::PatreonApi,
    cli::Args,
    config::{parse_creator_id, validate_config, Config},
    download::{CrawlOptions, Crawler},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_crawl_summary, print_error, print_info,
        print_success, print_warning, EventPrinter,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::Policy(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Authentication(_)
                | Error::Api(_)
                | Error::Transport(_)
                | Error::CampaignNotFound(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::Download(_) | Error::FileSystem(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let creator_id = match config.targeted_creator.creator_id.as_deref() {
        Some(id) => parse_creator_id(id)?,
        None => return Err(Error::MissingConfig("creator_id".to_string())),
    };

    // Policies are checked before any network activity
    let options = CrawlOptions::from_config(&config)?;

    print_config_summary(
        &creator_id,
        &options.grouping.to_string(),
        options.concurrency,
        &options.output_root,
    );

    let api = PatreonApi::new(
        config.my_account.cookie.clone(),
        &config.my_account.user_agent,
        config.request_timeout(),
    )?;

    print_info("Checking session...");
    match api.is_authenticated().await {
        Ok(true) => print_success("Session cookie accepted"),
        Ok(false) => print_warning("Session is not logged in, only public posts will be downloaded"),
        Err(e) => print_warning(&format!("Could not verify session: {}", e)),
    }

    // A single consumer renders all crawl events
    let (tx, mut rx) = mpsc::unbounded_channel();
    let quiet = args.quiet;
    let printer = tokio::spawn(async move {
        let mut printer = EventPrinter::new(quiet);
        while let Some(event) = rx.recv().await {
            printer.handle(event);
        }
        printer.finish();
    });

    let crawler = Crawler::new(api, options);
    let result = crawler.crawl_creator(&creator_id, &tx).await;

    drop(tx);
    if let Err(e) = printer.await {
        tracing::debug!("Event printer stopped: {}", e);
    }

    let summary = result?;
    print_crawl_summary(&creator_id, &summary);

    if summary.media_failed > 0 {
        print_warning(&format!(
            "{} media item(s) failed to download, run again to retry",
            summary.media_failed
        ));
    }

    Ok(())
}
