//! Command line entry point for the pump feed listener.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pump_listener::feed::{FeedSession, PUMP_WEBSOCKET_URL};
use pump_listener::sniper::HttpForwarder;
use pump_listener::{Pipeline, PipelineBuilder, PipelineConfig};
use std::time::Duration;
use tracing::{info, Level};

const DEFAULT_SNIPER_URL: &str = "http://sniper:6969";

#[derive(Parser)]
#[command(name = "pump-listener", version, about = "Listen to the pump.fun feed")]
struct Cli {
    /// Feed socket URL
    #[arg(long, global = true, default_value = PUMP_WEBSOCKET_URL)]
    feed_url: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for new listings and forward the promising ones
    Listen {
        #[arg(long, default_value = DEFAULT_SNIPER_URL)]
        sniper_url: String,
        /// Log every listing without filtering or forwarding
        #[arg(long)]
        no_filter: bool,
    },
    /// Listen on new trades
    ListenTrades {
        /// Show a live leaderboard instead of logging every trade
        #[arg(long)]
        leaderboard: bool,
        /// Rows shown in the leaderboard
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Mints tracked before the stalest is evicted (0 for unbounded)
        #[arg(long, default_value_t = pump_listener::leaderboard::DEFAULT_CAPACITY)]
        capacity: usize,
    },
    /// Check if the sniper service is healthy
    Health {
        #[arg(long, default_value = DEFAULT_SNIPER_URL)]
        sniper_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the leaderboard view readable by only letting warnings through
    let level = match (&cli.command, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Command::ListenTrades { leaderboard: true, .. }, false) => Level::WARN,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Listen {
            sniper_url,
            no_filter,
        } => {
            info!("Listening for new listings");
            let config = PipelineBuilder::new()
                .with_feed_url(cli.feed_url)
                .with_sniper_url(sniper_url)
                .listings_only()
                .with_filtering(!no_filter)
                .build();
            listen(config).await
        }
        Command::ListenTrades {
            leaderboard,
            top,
            capacity,
        } => {
            info!("Listening for new trades");
            let config = PipelineBuilder::new()
                .with_feed_url(cli.feed_url)
                .trades_only()
                .with_leaderboard_display(leaderboard)
                .with_leaderboard_size(top)
                .with_leaderboard_capacity((capacity > 0).then_some(capacity))
                .build();
            listen(config).await
        }
        Command::Health { sniper_url } => {
            let forwarder = HttpForwarder::new(sniper_url, Duration::from_secs(10))?;
            let body = forwarder
                .health()
                .await
                .with_context(|| format!("health check against {} failed", forwarder.health_url()))?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
    }
}

/// Run one session to completion; reconnecting is left to whoever restarts us.
async fn listen(config: PipelineConfig) -> Result<()> {
    let session = FeedSession::connect(&config.feed_url).await?;
    let mut pipeline = Pipeline::from_config(config)?;
    pipeline.run(session).await?;
    Ok(())
}
