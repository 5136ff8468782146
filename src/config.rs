use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model_path: String,
    pub port: u16,
    pub score_cache_ttl_secs: u64,
    pub score_cache_capacity: u64,
}

/// Default location of the serialized scoring pipeline, relative to the
/// working directory. Must match the path the export step writes to.
pub const DEFAULT_MODEL_PATH: &str = "final_bank_marketing_model.json";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
                .trim()
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            score_cache_ttl_secs: std::env::var("SCORE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SCORE_CACHE_TTL_SECS must be a valid number"))?,
            score_cache_capacity: std::env::var("SCORE_CACHE_CAPACITY")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SCORE_CACHE_CAPACITY must be a valid number"))?,
        };

        if config.model_path.is_empty() {
            anyhow::bail!("MODEL_PATH cannot be empty");
        }

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Model artifact path: {}", config.model_path);
        tracing::debug!(
            "Score cache: ttl={}s capacity={}",
            config.score_cache_ttl_secs,
            config.score_cache_capacity
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
