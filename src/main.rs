use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use depthx::api::create_router;
use depthx::config::AppConfig;
use depthx::engine::types::Pair;
use depthx::market_data::router::QuoteRouter;
use depthx::telemetry;

#[derive(Debug, Parser)]
#[command(name = "depthx", version, about = "Blended order-book quotes across venues")]
struct Cli {
    /// Extra config file layered over config/default.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve quotes over HTTP (default)
    Serve {
        #[arg(long)]
        bind: Option<String>,
        /// Port for the Prometheus exporter (needs the metrics-exporter feature)
        #[arg(long, default_value_t = 9000)]
        metrics_port: u16,
    },
    /// Price one order and print the result as JSON
    Quote {
        /// Pair as BASE:QUOTE, e.g. BTC:USDT
        pair: Pair,
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    telemetry::init_tracing(&cfg.log.filter);

    let router = Arc::new(QuoteRouter::from_config(&cfg)?);

    match cli.command.unwrap_or(Command::Serve { bind: None, metrics_port: 9000 }) {
        Command::Serve { bind, metrics_port } => {
            telemetry::init_metrics(metrics_port)?;
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            info!(%bind, sources = ?router.aggregator().source_ids(), "Serving quotes");
            axum::serve(listener, create_router(router))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Command::Quote { pair, amount } => {
            let quote = router.get_quote(&pair, amount).await;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
