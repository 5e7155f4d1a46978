use std::sync::Arc;

use readscore_analysis::provider::assemblyai::AssemblyAiProvider;
use readscore_analysis::provider::openai::OpenAiDiffProvider;
use readscore_analysis::{AnalysisConfig, ReadingAnalyzer};
use readscore_api::{build_router, state::AppState};
use readscore_config::{LogSettings, Settings};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    init_tracing(&settings.log);

    if settings.assemblyai.api_key.is_empty() {
        warn!("ASSEMBLYAI_API_KEY is not set; transcription calls will fail");
    }
    if settings.openai.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; comparison calls will fail");
    }

    let transcriber = Arc::new(AssemblyAiProvider::new(
        &settings.assemblyai.api_key,
        Some(&settings.assemblyai.base_url),
        &settings.assemblyai.language_code,
    ));
    let differ = Arc::new(OpenAiDiffProvider::new(
        &settings.openai.api_key,
        Some(&settings.openai.base_url),
        &settings.openai.model,
        settings.openai.max_tokens,
        settings.openai.temperature,
    ));
    let config = AnalysisConfig {
        max_poll_attempts: settings.polling.max_attempts,
        poll_interval_secs: settings.polling.interval_secs,
        transcription_cost_per_minute: settings.pricing.transcription_per_minute,
        diff_cost_per_thousand_tokens: settings.pricing.diff_per_thousand_tokens,
    };

    let analyzer = Arc::new(ReadingAnalyzer::new(transcriber, differ, config));
    let state = AppState::new(analyzer, settings.server.max_upload_bytes);
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "readscore API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
