//! Profile facts: the single-read upstream that everything downstream
//! (prompts, fallback copy, SEO) is derived from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::github::GithubConfig;
use crate::error::{Result, UpstreamError};
use crate::github::build_http_client;

/// Point-in-time snapshot of a user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFacts {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub email: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub created_at: DateTime<Utc>,
}

impl ProfileFacts {
    /// Display name with the login as fallback.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

/// Seam for the profile upstream; stubbed in tests.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, login: &str) -> Result<ProfileFacts>;
    fn name(&self) -> &'static str;
}

/// GitHub REST `/users/{login}` reader.
pub struct GithubProfileSource {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubProfileSource {
    pub fn new(cfg: &GithubConfig) -> Self {
        Self {
            http: build_http_client(cfg.request_timeout_secs),
            api_base: cfg.api_base.clone(),
            token: cfg.token.clone(),
        }
    }
}

#[async_trait]
impl ProfileSource for GithubProfileSource {
    async fn fetch_profile(&self, login: &str) -> Result<ProfileFacts> {
        let url = format!("{}/users/{}", self.api_base, login);
        let mut req = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(UpstreamError::from_transport)?;
        if !resp.status().is_success() {
            return Err(UpstreamError::from_status(resp.status()));
        }
        resp.json::<ProfileFacts>()
            .await
            .map_err(UpstreamError::from_transport)
    }

    fn name(&self) -> &'static str {
        "github-profile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_name_over_login() {
        let raw = r#"{
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "location": "San Francisco",
            "company": "@github",
            "blog": "https://github.blog",
            "email": null,
            "followers": 12000,
            "following": 9,
            "public_repos": 8,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;
        let facts: ProfileFacts = serde_json::from_str(raw).expect("parse profile");
        assert_eq!(facts.display_name(), "The Octocat");

        let anonymous = ProfileFacts {
            name: Some("   ".to_string()),
            ..facts
        };
        assert_eq!(anonymous.display_name(), "octocat");
    }
}
