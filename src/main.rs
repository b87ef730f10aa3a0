use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use ganga_watcher::config::LoggingConfig;
use ganga_watcher::orchestrator::Orchestrator;
use ganga_watcher::scheduler::CycleScheduler;
use ganga_watcher::AppConfig;

/// Watches Mexican store fronts for discounted products and reports the
/// profitable ones by email and WhatsApp.
#[derive(Parser)]
#[command(name = "ganga-watcher", version, about)]
struct Args {
    /// Run a single search-and-analysis cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::from_env()?;
    init_tracing(&config.logging)?;

    let missing = config.notifications.missing_credentials();
    if !missing.is_empty() {
        anyhow::bail!("Missing required credentials: {}", missing.join(", "));
    }

    info!("Starting Ganga Watcher...");

    let orchestrator = Orchestrator::new(&config)?;
    if args.once {
        let outcome = orchestrator.run_cycle().await;
        info!("{}", outcome);
    } else {
        CycleScheduler::new(orchestrator, &config.scheduler)
            .run()
            .await;
    }

    info!("Shutting down...");
    Ok(())
}

/// `RUST_LOG` wins when set; `LOG_LEVEL` is the fallback. With `LOG_FILE`
/// configured, output goes to stdout and the file in append mode.
fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.clone()))?;

    match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}
