// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_output_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    12
}

/// Generation config loaded from `config/ai.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// "groq" | "mock" (case-insensitive)
    pub provider: String,
    /// "ENV" means: read from GROQ_API_KEY
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "groq".to_string(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        // Normalize provider
        cfg.provider = cfg.provider.to_lowercase();

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "groq" => env::var("GROQ_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing GROQ_API_KEY env var"))?,
                "mock" => String::new(),
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        // Sanitize sampling knobs
        if !(0.0..=2.0).contains(&cfg.temperature) {
            cfg.temperature = default_temperature();
        }
        if cfg.max_output_tokens == 0 {
            cfg.max_output_tokens = default_max_output_tokens();
        }

        Ok(cfg)
    }

    /// Load config from the default path; a missing or unreadable file means
    /// generation stays disabled and every consumer gets fallback content.
    pub fn load_or_disabled() -> Self {
        match Self::load_from_file("config/ai.json") {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!(error = %e, "ai config not loaded, generation disabled");
                Self::default()
            }
        }
    }
}
