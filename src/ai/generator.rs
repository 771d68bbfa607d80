//! Per-content generation pipeline: prompt → completion → extraction →
//! shape check, with the fallback path closing every failure branch.
//!
//! Callers always receive complete, well-typed content. The only visible
//! difference between a model answer and a bad day upstream is the
//! [`ContentOrigin`] tag.

use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::client::{CompletionClient, CompletionRequest};
use crate::ai::extract::extract_json;
use crate::ai::fallback::{fallback_seo, fallback_summary};
use crate::ai::{ContentOrigin, ProfileSummary, SeoMetadata};
use crate::config::ai::AiConfig;
use crate::github::profile::ProfileFacts;

const PROFILE_SYSTEM: &str = "You are a professional technical writer specializing in developer profiles. Write clear, concise, and professional content that highlights technical achievements and expertise. Use professional language, avoid flowery prose or excessive storytelling. Focus on facts, metrics, and concrete achievements. Keep the tone professional and suitable for a portfolio website.";

const SEO_SYSTEM: &str =
    "You are an SEO expert. Generate SEO-optimized metadata for developer portfolios.";

const SEO_MAX_TOKENS: u32 = 300;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "generation_completed_total",
            "Content pieces produced from a model response."
        );
        describe_counter!(
            "generation_fallback_total",
            "Content pieces produced by the deterministic fallback."
        );
    });
}

/// Generates both portfolio content pieces for a profile. One instance per
/// process; the client seam carries all provider state.
#[derive(Clone)]
pub struct ContentGenerator {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
    max_output_tokens: u32,
}

impl ContentGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, config: &AiConfig) -> Self {
        Self {
            client,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub async fn profile_summary(&self, facts: &ProfileFacts) -> (ProfileSummary, ContentOrigin) {
        ensure_metrics_described();
        let req = CompletionRequest {
            system: PROFILE_SYSTEM.to_string(),
            prompt: build_profile_prompt(facts),
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        };

        match self.client.complete(&req).await {
            Ok(text) => match extract_json(&text) {
                Ok(value) => {
                    counter!("generation_completed_total").increment(1);
                    (shape_summary(&value), ContentOrigin::Generated)
                }
                Err(e) => {
                    warn!(
                        provider = self.client.provider_name(),
                        error = %e,
                        head = %text.chars().take(200).collect::<String>(),
                        "profile summary extraction failed, using fallback"
                    );
                    counter!("generation_fallback_total").increment(1);
                    (fallback_summary(facts), ContentOrigin::Fallback)
                }
            },
            Err(e) => {
                debug!(
                    provider = self.client.provider_name(),
                    error = %e,
                    "profile summary completion failed, using fallback"
                );
                counter!("generation_fallback_total").increment(1);
                (fallback_summary(facts), ContentOrigin::Fallback)
            }
        }
    }

    pub async fn seo_metadata(&self, facts: &ProfileFacts) -> (SeoMetadata, ContentOrigin) {
        ensure_metrics_described();
        let req = CompletionRequest {
            system: SEO_SYSTEM.to_string(),
            prompt: build_seo_prompt(facts),
            temperature: self.temperature,
            max_tokens: SEO_MAX_TOKENS,
        };

        match self.client.complete(&req).await {
            Ok(text) => match extract_json(&text) {
                Ok(value) => {
                    counter!("generation_completed_total").increment(1);
                    (shape_seo(&value), ContentOrigin::Generated)
                }
                Err(e) => {
                    warn!(
                        provider = self.client.provider_name(),
                        error = %e,
                        head = %text.chars().take(200).collect::<String>(),
                        "seo extraction failed, using fallback"
                    );
                    counter!("generation_fallback_total").increment(1);
                    (fallback_seo(facts), ContentOrigin::Fallback)
                }
            },
            Err(e) => {
                debug!(
                    provider = self.client.provider_name(),
                    error = %e,
                    "seo completion failed, using fallback"
                );
                counter!("generation_fallback_total").increment(1);
                (fallback_seo(facts), ContentOrigin::Fallback)
            }
        }
    }
}

fn build_profile_prompt(facts: &ProfileFacts) -> String {
    format!(
        r#"Create a professional developer profile summary for {name}.

Bio: {bio}
Location: {location}
Company: {company}
Public Repositories: {repos}
Followers: {followers}

Generate professional content:
1. Summary (2-3 sentences): A concise, professional overview highlighting their expertise, experience, and key achievements. Focus on technical skills and contributions. Avoid flowery language or excessive storytelling.
2. Highlights (3-4 items): Concise bullet points focusing on concrete achievements and metrics. Format as: "X public repositories" or "Y followers". Keep factual and professional.
3. Skills (5-7 items): Technical skills and areas of expertise. Use professional terminology like "Software Development", "Version Control", "Open Source Contributions", etc.

IMPORTANT: Return ONLY valid JSON. Do not include markdown code blocks, explanations, or any text outside the JSON object. Start with {{ and end with }}.

{{
  "summary": "Professional 2-3 sentence summary...",
  "highlights": ["Concise highlight 1", "Concise highlight 2"],
  "skills": ["Skill 1", "Skill 2", ...]
}}"#,
        name = facts.display_name(),
        bio = facts.bio.as_deref().unwrap_or("Not provided"),
        location = facts.location.as_deref().unwrap_or("Not specified"),
        company = facts.company.as_deref().unwrap_or("Not specified"),
        repos = facts.public_repos,
        followers = facts.followers,
    )
}

fn build_seo_prompt(facts: &ProfileFacts) -> String {
    format!(
        r#"Generate SEO metadata for {name}'s developer portfolio.

Bio: {bio}
Public Repositories: {repos}

Provide:
1. SEO title (50-60 characters)
2. Meta description (150-160 characters)
3. 5-10 relevant keywords

IMPORTANT: Return ONLY valid JSON. Do not include markdown code blocks, explanations, or any text outside the JSON object. Start with {{ and end with }}.

{{
  "title": "...",
  "description": "...",
  "keywords": ["...", "..."]
}}"#,
        name = facts.display_name(),
        bio = facts.bio.as_deref().unwrap_or("Not provided"),
        repos = facts.public_repos,
    )
}

/// Shape-check an extracted value. Missing or mistyped fields degrade to
/// empty values instead of rejecting the whole object.
fn shape_summary(value: &Value) -> ProfileSummary {
    ProfileSummary {
        summary: str_field(value, "summary"),
        highlights: string_seq(value, "highlights"),
        skills: string_seq(value, "skills"),
    }
}

fn shape_seo(value: &Value) -> SeoMetadata {
    SeoMetadata {
        title: str_field(value, "title"),
        description: str_field(value, "description"),
        keywords: string_seq(value, "keywords"),
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_seq(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
