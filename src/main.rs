use std::process::ExitCode;
use std::sync::Arc;

mod ai;
mod config;
mod db;
mod error;
mod models;
mod newsletter;
mod pipeline;
mod server;
mod services;
mod sources;

use config::Config;
use error::Result;
use pipeline::Pipeline;
use server::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging (INFO by default, overridable via RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::load()?;

    // One-off subscriber import, then exit
    if args.len() >= 2 && args[1] == "--import-subscribers" {
        let Some(url) = config.subscribers_csv_url.clone() else {
            tracing::error!("subscribers_csv_url is not configured");
            return Ok(false);
        };
        let repo = db::Repository::new(&config.db_path).await?;
        let report = services::import_subscribers(&repo, &url).await?;
        println!(
            "Imported subscribers: {} upserted, {} skipped, {} errors",
            report.upserted, report.skipped, report.errors
        );
        return Ok(report.errors == 0);
    }

    // Serve the control surface; pipeline runs only on POST /trigger
    if args.len() >= 2 && args[1] == "--serve" {
        let port = config.listen_port;
        let cron_secret = config.cron_secret.clone();
        let pipeline = Arc::new(Pipeline::from_config(config).await?);
        server::serve(
            AppState {
                pipeline,
                cron_secret,
            },
            port,
        )
        .await?;
        return Ok(true);
    }

    // Default: one pipeline run, exit code reflects the outcome
    let pipeline = Pipeline::from_config(config).await?;
    let summary = pipeline.run().await;
    Ok(summary.success)
}
