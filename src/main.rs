mod commands;
mod site;

use clap::{Parser, Subcommand};
use marketx_content::{ContentRenderer, TranslationTable};
use marketx_core::{
    config::{self, shellexpand, SiteConfig},
    document::{Document, Page},
    language::Language,
};
use marketx_feed::{refresh_prices, Commodity, HttpPriceSource, RefreshOutcome};
use tokio::sync::Mutex;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "marketx",
    version,
    about = "Market X Trader bilingual landing page runtime"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the page with live prices and clock until Ctrl-C.
    Start,
    /// Render the page copy in one language and print it.
    Render {
        /// Language code (ENG or KH).
        #[arg(short, long, default_value = "ENG")]
        lang: Language,
        /// Print the whole page as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fetch gold prices once and print them.
    Prices,
    /// Show the effective configuration.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg.site);

    match cli.command {
        Commands::Start => {
            let mut site = site::Site::from_config(cfg)?;
            site.start().await;
            site.run().await?;
        }
        Commands::Render { lang, json } => {
            let table = TranslationTable::load(cfg.site.translations.as_deref())?;
            let mut page = site::landing_page(&table);
            let mut renderer = ContentRenderer::new(table);
            let report = renderer.render(&mut page, lang);

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                for (slot, _) in renderer.table().slots() {
                    if let Some(text) = page.text(slot) {
                        println!("{slot}: {text}");
                    }
                }
                info!(
                    "render: {} slots written, {} missing",
                    report.written,
                    report.missing.len()
                );
            }
        }
        Commands::Prices => {
            if cfg.feed.url.trim().is_empty() {
                anyhow::bail!("feed.url is empty. Set it in config.toml.");
            }
            let source = HttpPriceSource::from_config(&cfg.feed);
            let mut page = Page::new();
            for commodity in Commodity::ALL {
                page = page.with_element(commodity.slot_id(), "");
            }
            let doc = Mutex::new(page);

            let outcome = refresh_prices(&source, &doc).await;
            let page = doc.into_inner();
            println!(
                "Gold prices ({})",
                chrono::Local::now().format("%d/%m/%Y %I:%M %p")
            );
            for commodity in Commodity::ALL {
                println!(
                    "  {:<7} {}",
                    commodity.key(),
                    page.text(commodity.slot_id()).unwrap_or_default()
                );
            }
            if let RefreshOutcome::Failed(e) = outcome {
                anyhow::bail!("price feed unavailable: {e}");
            }
        }
        Commands::Status => {
            println!("Market X status\n");
            println!("Config: {}", cli.config);
            println!("Site: {}", cfg.site.name);
            println!("Log level: {}", cfg.site.log_level);
            println!(
                "Log file: {}",
                cfg.site
                    .log_dir
                    .as_deref()
                    .map(|d| format!("{}/marketx.log", shellexpand(d)))
                    .unwrap_or_else(|| "console only".to_string())
            );
            println!();

            match TranslationTable::load(cfg.site.translations.as_deref()) {
                Ok(table) => println!(
                    "  translations: {} slots ({})",
                    table.len(),
                    cfg.site.translations.as_deref().unwrap_or("bundled")
                ),
                Err(e) => println!("  translations: error ({e})"),
            }
            println!(
                "  feed: {}",
                if cfg.feed.enabled {
                    format!(
                        "every {}s, timeout {}, {}",
                        cfg.feed.interval_secs,
                        if cfg.feed.timeout_secs == 0 {
                            "none".to_string()
                        } else {
                            format!("{}s", cfg.feed.timeout_secs)
                        },
                        cfg.feed.url
                    )
                } else {
                    "disabled".to_string()
                }
            );
            println!(
                "  clock: {}",
                if cfg.clock.enabled {
                    format!(
                        "every {}s, date '{}', time '{}', posted '{}'",
                        cfg.clock.interval_secs,
                        cfg.clock.date_format,
                        cfg.clock.time_format,
                        cfg.clock.posted_time
                    )
                } else {
                    "disabled".to_string()
                }
            );
            println!(
                "  typewriter: {}",
                if cfg.effects.typewriter {
                    format!("{}ms per character", cfg.effects.typewriter_ms)
                } else {
                    "disabled".to_string()
                }
            );
        }
    }

    Ok(())
}

/// Console logging to stderr, or a log file when `site.log_dir` is set.
///
/// `RUST_LOG` overrides the configured level. Keep the returned guard alive
/// until exit so buffered file output is flushed.
fn init_logging(cfg: &SiteConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    match &cfg.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(shellexpand(dir), "marketx.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
