//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use social_spark::adapters::ai::{MockLlmAdapter, OpenAiAdapter};
use social_spark::adapters::export::MarkdownExporter;
use social_spark::adapters::tools::FetchUrlContentTool;
use social_spark::adapters::ui::tui::TuiInputPort;
use social_spark::adapters::web::HttpContentFetcher;
use social_spark::ports::{ContentFetcherPort, InputPort, LlmPort, PostExportPort, ToolPort};
use social_spark::shared::config::AppConfig;
use social_spark::usecases::Actions;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // --- Model: OpenAI-compatible when a key is set, otherwise offline mock ---
    let (llm, model_label): (Arc<dyn LlmPort>, String) = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            max_tool_rounds = cfg.max_tool_rounds_or_default(),
            "using OpenAI-compatible model adapter"
        );
        let adapter = OpenAiAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        )
        .with_temperature(cfg.ai_temperature_or_default())
        .with_max_tool_rounds(cfg.max_tool_rounds_or_default());
        (Arc::new(adapter), cfg.ai_model_or_default())
    } else {
        warn!("SOCIAL_SPARK_AI_API_KEY not set, using mock model adapter");
        (Arc::new(MockLlmAdapter::new()), "mock".to_string())
    };

    // --- Page fetching, exposed to the model as a tool ---
    let fetch_timeout = Duration::from_secs(cfg.fetch_timeout_secs_or_default());
    let fetcher: Arc<dyn ContentFetcherPort> = Arc::new(
        HttpContentFetcher::new(&cfg.fetch_user_agent_or_default(), fetch_timeout)
            .map_err(|e| anyhow::anyhow!("HTTP client init failed: {}", e))?,
    );
    let fetch_tool: Arc<dyn ToolPort> = Arc::new(FetchUrlContentTool::new(fetcher));

    // --- Services ---
    let actions = Arc::new(Actions::new(llm, fetch_tool));

    let output_dir = PathBuf::from(cfg.output_dir_or_default());
    info!(path = %output_dir.display(), "export directory");
    let exporter: Arc<dyn PostExportPort> = Arc::new(MarkdownExporter::new(output_dir));

    social_spark::adapters::ui::init_ui(&model_label);

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(actions, exporter));

    // --- Run (main menu -> Promote / Recap / Exit) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
