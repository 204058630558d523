//! Stockdash CLI
//!
//! Command-line front end for the dashboard API:
//! - List tickers and their holders
//! - Trigger a data update
//! - Show the latest update
//! - Generate a config file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stockdash::api::{ApiClient, Pagination, TickerQuery, UpdateInfo};
use stockdash::config::{generate_default_config, Config, LoadedConfig, LoggingConfig};
use stockdash::format::{format_date, format_date_time, format_number};
use stockdash::{Document, Refresh, UpdateAction, UpdateResult};

#[derive(Parser)]
#[command(name = "stockdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stock holder dashboard client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dashboard server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tickers with their holder counts
    Tickers {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        /// Only tickers held by several individual holders
        #[arg(long)]
        multiple_holders: bool,
        /// Minimum holder count with --multiple-holders
        #[arg(long)]
        min_holders: Option<u32>,
    },

    /// Show the latest top holders of a ticker
    Holders {
        /// Ticker code, e.g. 000001.SZ
        ts_code: String,
    },

    /// List individual holders, or one holder's tickers
    Holder {
        /// Holder name; omit to list holders by ticker count
        name: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        per_page: u32,
    },

    /// Ask the server to refresh its data
    Update,

    /// Show when the data was last refreshed
    UpdateInfo,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => LoadedConfig {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            errors: Vec::new(),
        },
        None => Config::load_default(),
    };
    let mut config = loaded.config;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    for error in &loaded.errors {
        tracing::warn!("{}", error);
    }
    match &loaded.source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    let client = ApiClient::new(config.api.client_config());
    let json = cli.format == "json";

    match cli.command {
        Commands::Tickers {
            page,
            per_page,
            multiple_holders,
            min_holders,
        } => {
            let query = TickerQuery {
                page,
                per_page,
                multiple_holders,
                min_holders,
            };
            let response = client.get_tickers_page(&query).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let pagination = response.pagination;
            let latest = response.latest_update.clone();
            let tickers = response.into_data()?;

            if tickers.is_empty() {
                println!("No tickers found.");
            } else {
                println!(
                    "{:<12} {:<16} {:<12} {:<12} {}",
                    "Code", "Name", "Industry", "Listed", "Holders"
                );
                println!("{}", "-".repeat(64));
                for ticker in &tickers {
                    println!(
                        "{:<12} {:<16} {:<12} {:<12} {}",
                        ticker.ts_code,
                        ticker.name.as_deref().unwrap_or("-"),
                        ticker.industry,
                        format_date(ticker.list_date.as_deref()),
                        ticker.holder_count
                    );
                }
            }

            print_footer(pagination, latest.as_ref());
        }

        Commands::Holders { ts_code } => {
            let response = client.get_ticker_holders(&ts_code).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let latest = response.latest_update.clone();
            let detail = response.into_data()?;

            println!(
                "{} {} ({})",
                detail.ts_code,
                detail.name.as_deref().unwrap_or("-"),
                detail.industry
            );
            println!(
                "Holders as of {}",
                format_date(detail.latest_holder_date.as_deref())
            );
            println!();

            if detail.holders.is_empty() {
                println!("No holder data available.");
            } else {
                println!(
                    "{:<24} {:>14} {:>8} {:>14} {}",
                    "Holder", "Amount", "Ratio", "Change", "Announced"
                );
                println!("{}", "-".repeat(76));
                for holder in &detail.holders {
                    println!(
                        "{:<24} {:>14} {:>8} {:>14} {}",
                        holder.holder_name,
                        holder.hold_amount.map(format_number).unwrap_or_else(|| "-".into()),
                        holder
                            .hold_ratio
                            .map(|r| format!("{:.2}%", r))
                            .unwrap_or_else(|| "-".into()),
                        holder.hold_change.map(format_number).unwrap_or_else(|| "-".into()),
                        format_date(holder.ann_date.as_deref())
                    );
                }
            }

            print_footer(None, latest.as_ref());
        }

        Commands::Holder {
            name: Some(name),
            ..
        } => {
            let response = client.get_holder_tickers(&name).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let latest = response.latest_update.clone();
            let holdings = response.into_data()?;

            println!("{}", holdings.holder_name);
            println!();
            if holdings.tickers.is_empty() {
                println!("No holdings found.");
            } else {
                println!(
                    "{:<12} {:<16} {:>14} {:>8} {:>14} {}",
                    "Code", "Name", "Amount", "Ratio", "Change", "Period"
                );
                println!("{}", "-".repeat(80));
                for holding in &holdings.tickers {
                    println!(
                        "{:<12} {:<16} {:>14} {:>8} {:>14} {}",
                        holding.ts_code,
                        holding.name.as_deref().unwrap_or("-"),
                        holding.hold_amount.map(format_number).unwrap_or_else(|| "-".into()),
                        holding
                            .hold_ratio
                            .map(|r| format!("{:.2}%", r))
                            .unwrap_or_else(|| "-".into()),
                        holding.hold_change.map(format_number).unwrap_or_else(|| "-".into()),
                        format_date(holding.end_date.as_deref())
                    );
                }
            }

            print_footer(None, latest.as_ref());
        }

        Commands::Holder {
            name: None,
            page,
            per_page,
        } => {
            let response = client.get_holders(page, per_page).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let pagination = response.pagination;
            let latest = response.latest_update.clone();
            let holders = response.into_data()?;

            if holders.is_empty() {
                println!("No holders found.");
            } else {
                println!("{:<32} {}", "Holder", "Tickers");
                println!("{}", "-".repeat(40));
                for holder in &holders {
                    println!("{:<32} {}", holder.holder_name, holder.ticker_count);
                }
            }

            print_footer(pagination, latest.as_ref());
        }

        Commands::Update => {
            let mut doc = Document::with_toast_timing(config.ui.toast_timing());
            let settings = config.ui.update_settings();
            doc.add_element(settings.status_id.clone());
            doc.add_modal(settings.modal_id.clone());
            let page = Arc::new(Mutex::new(doc));

            let action = UpdateAction::with_settings(client.clone(), Arc::clone(&page), settings);
            let refresh: Arc<dyn Refresh> = Arc::new(TickerCountRefresh { client });
            let report = action.run(Some(refresh)).await;

            for toast in page.lock().await.toasts().iter() {
                println!("[{}] {}", toast.severity, toast.message);
            }

            match report.result {
                UpdateResult::Succeeded(message) => {
                    if !message.is_empty() {
                        println!("{}", message);
                    }
                    if let Some(follow_up) = report.follow_up {
                        follow_up.await.context("refresh task failed")?;
                    }
                }
                UpdateResult::Failed(_) => std::process::exit(1),
            }
        }

        Commands::UpdateInfo => {
            let response = client.get_update_info().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let info = response.into_data()?;
            print_update_info(&info);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Reloads the ticker list once an update has finished
struct TickerCountRefresh {
    client: ApiClient,
}

#[async_trait]
impl Refresh for TickerCountRefresh {
    async fn refresh(&self) {
        match self.client.get_tickers().await {
            Ok(response) => {
                let total = response
                    .pagination
                    .map(|p| p.total)
                    .or_else(|| response.data.as_ref().map(|d| d.len() as u64))
                    .unwrap_or(0);
                println!("Reloaded: {} tickers", total);
            }
            Err(e) => eprintln!("Reload failed: {}", e),
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockdash={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_footer(pagination: Option<Pagination>, latest: Option<&UpdateInfo>) {
    if let Some(p) = pagination {
        println!();
        println!("Page {} of {} ({} total)", p.page, p.total_pages, p.total);
    }
    if let Some(info) = latest {
        println!();
        print_update_info(info);
    }
}

fn print_update_info(info: &UpdateInfo) {
    if let Some(error) = &info.error {
        println!("Update info unavailable: {}", error);
        return;
    }
    println!(
        "Data as of {}, last refreshed {}",
        format_date(info.last_data_update.as_deref()),
        format_date_time(info.log_timestamp.as_deref())
    );
}
