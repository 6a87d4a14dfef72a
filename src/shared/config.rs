//! Application configuration. Model credentials, fetcher settings, paths.

use serde::Deserialize;

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Model
    // ─────────────────────────────────────────────────────────────────────────
    /// API key for the chat completions endpoint. Read from SOCIAL_SPARK_AI_API_KEY.
    /// Unset means the mock model is used.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Chat completions URL. Defaults to OpenAI. Read from SOCIAL_SPARK_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model name. Defaults to "gpt-4o-mini". Read from SOCIAL_SPARK_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Sampling temperature (default 0.7). Read from SOCIAL_SPARK_AI_TEMPERATURE.
    #[serde(default)]
    pub ai_temperature: Option<f32>,

    /// Tool-call round trips allowed per generation (default 3).
    #[serde(default)]
    pub max_tool_rounds: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Page fetching
    // ─────────────────────────────────────────────────────────────────────────
    /// Request timeout for event pages in seconds (default 20).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// User-Agent sent to event pages. Defaults to a desktop Chrome string.
    #[serde(default)]
    pub fetch_user_agent: Option<String>,

    /// Directory for Markdown exports (default ./output).
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("SOCIAL_SPARK_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // env wins over the file
        c = c.add_source(config::Environment::with_prefix("SOCIAL_SPARK"));
        c.build()?.try_deserialize()
    }

    /// Returns the API key if configured and non-blank.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns true if a real model is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string())
    }

    pub fn ai_temperature_or_default(&self) -> f32 {
        self.ai_temperature
            .unwrap_or(crate::adapters::ai::openai_adapter::DEFAULT_TEMPERATURE)
    }

    pub fn max_tool_rounds_or_default(&self) -> usize {
        self.max_tool_rounds
            .unwrap_or(crate::adapters::ai::openai_adapter::DEFAULT_MAX_TOOL_ROUNDS)
    }

    pub fn fetch_timeout_secs_or_default(&self) -> u64 {
        self.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
    }

    pub fn fetch_user_agent_or_default(&self) -> String {
        self.fetch_user_agent
            .clone()
            .unwrap_or_else(|| crate::adapters::web::DEFAULT_USER_AGENT.to_string())
    }

    pub fn output_dir_or_default(&self) -> String {
        self.output_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert!(!cfg.is_ai_configured());
        assert_eq!(cfg.ai_api_url_or_default(), DEFAULT_AI_API_URL);
        assert_eq!(cfg.ai_model_or_default(), "gpt-4o-mini");
        assert_eq!(cfg.ai_temperature_or_default(), 0.7);
        assert_eq!(cfg.max_tool_rounds_or_default(), 3);
        assert_eq!(cfg.fetch_timeout_secs_or_default(), 20);
        assert!(cfg.fetch_user_agent_or_default().starts_with("Mozilla/5.0"));
        assert_eq!(cfg.output_dir_or_default(), "./output");
    }

    #[test]
    fn test_blank_api_key_means_mock() {
        let cfg = AppConfig {
            ai_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(!cfg.is_ai_configured());
    }

    #[test]
    fn test_values_deserialize_from_config_source() {
        let source = config::Config::builder()
            .set_override("ai_model", "llama3.2")
            .unwrap()
            .set_override("max_tool_rounds", 5)
            .unwrap()
            .set_override("ai_temperature", 0.2)
            .unwrap()
            .build()
            .unwrap();
        let cfg: AppConfig = source.try_deserialize().unwrap();
        assert_eq!(cfg.ai_model_or_default(), "llama3.2");
        assert_eq!(cfg.max_tool_rounds_or_default(), 5);
        assert!((cfg.ai_temperature_or_default() - 0.2).abs() < f32::EPSILON);
    }
}
