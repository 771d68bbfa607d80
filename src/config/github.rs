// src/config/github.rs
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

pub const DEFAULT_GITHUB_CONFIG_PATH: &str = "config/github.toml";
pub const ENV_GITHUB_CONFIG_PATH: &str = "GITHUB_CONFIG_PATH";

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_per_page() -> u32 {
    100
}
fn default_max_pages() -> u32 {
    10
}
fn default_ttl_secs() -> u64 {
    3600
}

/// Upstream + windowing knobs for the GitHub sources.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token; normally injected via the GITHUB_TOKEN env var, which
    /// always wins over the file.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_ttl_secs")]
    pub profile_ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub contributions_ttl_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty github config defaults")
    }
}

impl GithubConfig {
    /// Load from a TOML file. Uses GITHUB_CONFIG_PATH or defaults to
    /// "config/github.toml"; a missing file yields the defaults so the
    /// service boots in a bare environment.
    pub fn from_toml() -> Self {
        let path = env::var(ENV_GITHUB_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_GITHUB_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "github config invalid, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(token) = env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                cfg.token = Some(token);
            }
        }
        if let Ok(base) = env::var("GITHUB_API_BASE") {
            if !base.trim().is_empty() {
                cfg.api_base = base;
            }
        }

        cfg.sanitize();
        cfg
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: GithubConfig = toml::from_str(toml_str)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn sanitize(&mut self) {
        // The upstream caps page size at 100; 0 pages would never fetch.
        self.per_page = self.per_page.clamp(1, 100);
        self.max_pages = self.max_pages.max(1);
        self.api_base = self.api_base.trim_end_matches('/').to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = GithubConfig::default();
        assert_eq!(cfg.api_base, "https://api.github.com");
        assert_eq!(cfg.per_page, 100);
        assert_eq!(cfg.max_pages, 10);
        assert!(cfg.token.is_none());
    }

    #[test]
    fn sanitize_clamps_pagination_and_trims_base() {
        let cfg = GithubConfig::from_toml_str(
            r#"
            api_base = "https://gh.example.com/"
            per_page = 500
            max_pages = 0
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.api_base, "https://gh.example.com");
        assert_eq!(cfg.per_page, 100);
        assert_eq!(cfg.max_pages, 1);
    }
}
