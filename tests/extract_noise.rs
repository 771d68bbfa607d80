//! Extraction contract against the noise shapes models actually produce.

use github_portfolio_service::ai::{extract_json, ExtractError};
use serde_json::json;

#[test]
fn recovers_from_fenced_code_block() {
    assert_eq!(
        extract_json("```json\n{\"a\":1}\n```").unwrap(),
        json!({"a": 1})
    );
}

#[test]
fn recovers_from_surrounding_prose() {
    assert_eq!(
        extract_json("Sure! {\"a\":1} — hope that helps.").unwrap(),
        json!({"a": 1})
    );
}

#[test]
fn repairs_trailing_comma() {
    assert_eq!(extract_json("{\"a\":1,}").unwrap(), json!({"a": 1}));
}

#[test]
fn reports_failure_without_json() {
    assert!(matches!(
        extract_json("no json here at all"),
        Err(ExtractError::NoJsonFound)
    ));
}

#[test]
fn recovers_full_profile_shape_from_noisy_response() {
    let response = concat!(
        "Here is the requested profile content:\n\n",
        "```json\n",
        "{\n",
        "  \"summary\": \"A developer.\",\n",
        "  \"highlights\": [\"8 public repositories\", \"42 followers\",],\n",
        "  \"skills\": [\"Rust\", \"Systems Programming\"],\n",
        "}\n",
        "```\n\n",
        "Let me know if you need adjustments!"
    );
    let value = extract_json(response).unwrap();
    assert_eq!(value["summary"], "A developer.");
    assert_eq!(value["highlights"].as_array().unwrap().len(), 2);
    assert_eq!(value["skills"][1], "Systems Programming");
}
