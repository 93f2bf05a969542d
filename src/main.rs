// Main entry point - Configuration, dependency injection and the report run
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::report_service::ReportService;
use crate::infrastructure::config::{load_report_config, ConfigOverrides};
use crate::infrastructure::mysql_repository::MySqlEventRepository;
use crate::infrastructure::pdf_writer::{PageLayout, PdfDocumentWriter};
use crate::presentation::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let overrides = ConfigOverrides::from(Cli::parse());
    let config = load_report_config(&overrides).context("Failed to load configuration")?;

    // Create adapters (infrastructure layer)
    tracing::info!("Reading events from {}", config.database);
    let repository = Arc::new(MySqlEventRepository::new(&config.database, config.window));
    let writer = Arc::new(PdfDocumentWriter::new(PageLayout::default()));

    // Run the report (application layer)
    let service = ReportService::new(repository, writer);
    let outcome = service
        .generate(&config.output.path)
        .await
        .context("Report generation failed")?;

    for (section, rows) in &outcome.rows {
        tracing::debug!("{} chart: {} bars", section, rows);
    }
    println!(
        "Wrote {} pages to {}",
        outcome.pages,
        config.output.path.display()
    );

    Ok(())
}
