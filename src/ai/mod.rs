//! AI-derived portfolio copy: completion client seam, JSON recovery from
//! noisy model output, and the deterministic fallback path.

pub mod client;
pub mod extract;
pub mod fallback;
pub mod generator;

use serde::{Deserialize, Serialize};

/// Where a piece of generated content came from. Either the whole object is
/// model-derived or the whole object is fallback-derived; the two are never
/// merged field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrigin {
    Generated,
    Fallback,
}

/// Display-ready "about" copy for a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Search metadata for the rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

pub use client::{build_completion_client, CompletionClient, CompletionRequest};
pub use extract::{extract_json, ExtractError};
pub use fallback::{fallback_seo, fallback_summary};
pub use generator::ContentGenerator;
