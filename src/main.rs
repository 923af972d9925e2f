use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be populated.
    let dotenv = dotenvy::dotenv();
    geeknews_reporter::setup_logging();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    match geeknews_reporter::run_from_env().await {
        Ok(report) => {
            info!(
                "Run {} complete: {} articles posted to {} (ts={})",
                report.correlation_id,
                report.articles,
                report.delivery.channel_id,
                report.delivery.message_timestamp.as_deref().unwrap_or("-")
            );
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error!("{}", failure);
            eprintln!("geeknews-reporter: {}", failure);
            ExitCode::from(failure.exit_code())
        }
    }
}
