//! Deterministic, network-free content from already-known profile facts.
//!
//! Used whenever the generative call fails outright or the extractor cannot
//! recover a JSON object. Pure functions: same facts in, same copy out.

use crate::ai::{ProfileSummary, SeoMetadata};
use crate::github::profile::ProfileFacts;

pub fn fallback_summary(facts: &ProfileFacts) -> ProfileSummary {
    let name = facts.display_name();
    let summary = match facts.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(bio) => bio.to_string(),
        None => format!(
            "{name} is a developer with {} public repositories on GitHub.",
            facts.public_repos
        ),
    };

    ProfileSummary {
        summary,
        highlights: vec![
            format!("{} public repositories", facts.public_repos),
            format!("{} followers on GitHub", facts.followers),
            match &facts.location {
                Some(loc) if !loc.trim().is_empty() => format!("Based in {loc}"),
                _ => "Active developer".to_string(),
            },
        ],
        skills: vec![
            "Software Development".to_string(),
            "Open Source".to_string(),
            "GitHub".to_string(),
        ],
    }
}

pub fn fallback_seo(facts: &ProfileFacts) -> SeoMetadata {
    let name = facts.display_name();
    let description = match facts.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(bio) => bio.to_string(),
        None => format!(
            "{name}'s developer portfolio showcasing projects and contributions on GitHub."
        ),
    };

    SeoMetadata {
        title: format!("{name} - Developer Portfolio"),
        description,
        keywords: vec![
            "developer".to_string(),
            "portfolio".to_string(),
            "github".to_string(),
            facts.login.clone(),
            "software engineer".to_string(),
        ],
    }
}
