mod metrics;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admit_core::{
    create_credential_provider, load_config, validate_config, BatchReport, BatchRunner,
    BatchSettings, CategoryCodes, CredentialProvider, IdentifierCodec, ImageRenderer, Mailer,
    Renderer, Roster, SanitizedConfig, SmtpMailer, TemplateResolver,
};

/// Outcome labels in report order.
const OUTCOMES: [&str; 5] = [
    "issued",
    "missing_fields",
    "resource_not_found",
    "render_failed",
    "delivery_failed",
];

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ADMIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("admit.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    if !config.paths.supplement.is_file() {
        warn!(
            "Supplement {:?} not found, every delivery will fail",
            config.paths.supplement
        );
    }

    let codes = CategoryCodes::from_config(&config.codes).context("Invalid code tables")?;

    let roster = Roster::from_path(&config.paths.input)
        .with_context(|| format!("Failed to read roster {:?}", config.paths.input))?;
    info!("Read {} rows from {:?}", roster.len(), config.paths.input);

    let renderer: Arc<dyn Renderer> = Arc::new(
        ImageRenderer::new(config.render.clone()).context("Failed to create ticket renderer")?,
    );
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config.mail.clone()));
    let credentials: Arc<dyn CredentialProvider> = Arc::from(create_credential_provider(
        &config.credentials,
        config.mail.login(),
    ));
    info!(
        "Using renderer: {}, mailer: {}, credentials: {}",
        renderer.name(),
        mailer.name(),
        credentials.method_name()
    );

    let runner = BatchRunner::new(
        BatchSettings::from_config(&config),
        IdentifierCodec::new(codes.clone()),
        TemplateResolver::new(
            config.paths.template_root.clone(),
            config.render.template_extension.clone(),
            codes,
        ),
        renderer,
        mailer,
        credentials,
    );

    let report = runner.run(&roster).await.context("Batch failed")?;
    log_summary(&report);

    if let Some(path) = &config.metrics.textfile {
        metrics::record_report(&report);
        metrics::write_textfile(path)?;
        info!("Metrics written to {:?}", path);
    }

    Ok(())
}

fn log_summary(report: &BatchReport) {
    info!(
        "Run {}: {} rows, {} issued, {} skipped, {} sequence numbers used",
        report.run_id,
        report.rows.len(),
        report.issued(),
        report.skipped(),
        report.sequences_used()
    );
    for label in OUTCOMES {
        let count = report.count(label);
        if count > 0 {
            info!("  {}: {}", label, count);
        }
    }
    for result in report.rows.iter().filter(|r| !r.outcome.is_issued()) {
        warn!("  row {} ({}): {}", result.row, result.name, result.outcome.label());
    }
}
