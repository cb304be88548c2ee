//! git-timelapse server
//!
//! # Usage
//! ```bash
//! git-timelapse                          # Serve on 127.0.0.1:3001
//! git-timelapse --port 8080 --host 0.0.0.0
//! RUST_LOG=debug git-timelapse           # Verbose logging
//! ```

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_timelapse::{app, AppState, Config};

/// Repository timelapse analysis server
#[derive(Parser)]
#[command(name = "git-timelapse")]
#[command(about = "Analyze how a git repository changed across a commit range", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "GIT_TIMELAPSE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, env = "GIT_TIMELAPSE_PORT", default_value = "3001")]
    port: u16,

    /// Shallow clone depth for remote repositories (0 = full history)
    #[arg(long, env = "GIT_TIMELAPSE_CLONE_DEPTH", default_value = "50")]
    clone_depth: u32,

    /// Commits read from the log
    #[arg(long, env = "GIT_TIMELAPSE_LOG_LIMIT", default_value = "100")]
    log_limit: usize,

    /// Newest commits a range can be picked from
    #[arg(long, env = "GIT_TIMELAPSE_DISPLAY_LIMIT", default_value = "50")]
    display_limit: usize,

    /// Commits that get a per-commit file tree
    #[arg(long, env = "GIT_TIMELAPSE_HISTORY_LIMIT", default_value = "50")]
    history_limit: usize,

    /// Timeout for a single git read, in seconds
    #[arg(long, env = "GIT_TIMELAPSE_GIT_TIMEOUT", default_value = "30")]
    git_timeout: u64,

    /// Timeout for cloning, in seconds
    #[arg(long, env = "GIT_TIMELAPSE_CLONE_TIMEOUT", default_value = "120")]
    clone_timeout: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            host: cli.host,
            port: cli.port,
            clone_depth: cli.clone_depth,
            log_limit: cli.log_limit,
            display_limit: cli.display_limit,
            history_limit: cli.history_limit,
            git_timeout: Duration::from_secs(cli.git_timeout),
            clone_timeout: Duration::from_secs(cli.clone_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from(Cli::parse());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Listening on http://{} (clone depth {}, log limit {}, display limit {})",
        addr,
        config.clone_depth,
        config.log_limit,
        config.display_limit
    );

    let app = app(AppState::new(config));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
