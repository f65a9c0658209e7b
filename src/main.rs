use clap::{Parser, Subcommand};
use omen::{api::signals::MAX_DAYS, app, config::Config, sources::CoinGeckoClient, tui, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "omen=debug,tower_http=debug";

/// Omen - rules-based crypto trading signals
#[derive(Debug, Parser)]
#[command(name = "omen", author, version, about = "Rules-based crypto trading signals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API (default)
    Serve,
    /// Open the terminal dashboard
    Dashboard,
    /// Compute API records once and print them as JSON
    Signals {
        /// History window in days
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS as i64))]
        days: Option<u32>,
        /// Quote currency
        #[arg(long)]
        vs: Option<String>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_tracing(false);
            serve(config).await
        }
        Command::Dashboard => {
            // The terminal owns stdout; only log when asked to
            if std::env::var_os("RUST_LOG").is_some() {
                init_tracing(true);
            }
            let state = state(config);
            tui::run_tui(state).await?;
            Ok(())
        }
        Command::Signals { days, vs, pretty } => {
            init_tracing(true);
            let days = days.unwrap_or(config.default_days);
            let vs = vs
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|| config.vs_currency.clone());

            let state = state(config);
            let records = state
                .signals
                .api_records(state.config.beginner_coins(), days, &vs)
                .await?;

            let json = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{}", json);
            Ok(())
        }
    }
}

fn init_tracing(stderr: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn state(config: Config) -> AppState {
    let source = Arc::new(CoinGeckoClient::new(
        config.coingecko_api_key.clone(),
        config.request_timeout,
    ));
    AppState::new(config, source)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    info!(
        "Starting Omen server on {} ({} API coins, {} days, {})",
        addr,
        config.beginner_coins().len(),
        config.default_days,
        config.vs_currency
    );

    let app = app(state(config));

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Omen server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
