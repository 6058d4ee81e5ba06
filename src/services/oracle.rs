use crate::core::scoring::DETERMINISTIC_POOL;
use crate::models::{OracleAssessment, Profile};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound accepted for any single oracle axis
pub const AXIS_MAX: f64 = 50.0;

/// Errors that can occur when consulting the compatibility oracle
///
/// Both variants are recovered per pair: the pair becomes undeterminable
/// and the run continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle response malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Unavailable(err.to_string())
    }
}

/// Source of subjective compatibility sub-scores for a pair
#[async_trait]
pub trait CompatibilityOracle: Send + Sync {
    /// Assess a pair given the deterministic sub-score already computed for it
    async fn assess(
        &self,
        a: &Profile,
        b: &Profile,
        deterministic: u8,
    ) -> Result<OracleAssessment, OracleError>;
}

/// Connection settings for the text-completion service
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Structured payload the model is asked to embed in its completion
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssessmentPayload {
    occupation: f64,
    interests: f64,
    names: f64,
    personality: f64,
    explanation: String,
    #[serde(default)]
    #[allow(dead_code)]
    total: Option<f64>,
}

/// Compatibility oracle backed by an OpenAI-style completions endpoint
pub struct OpenAiOracle {
    config: OracleConfig,
    client: Client,
}

impl OpenAiOracle {
    /// Create a new oracle client
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    /// Send a prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OracleError::Unavailable(format!(
                "Completion request failed: {}",
                response.status()
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(format!("Invalid completion body: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .ok_or_else(|| OracleError::Malformed("Completion has no choices".into()))
    }
}

#[async_trait]
impl CompatibilityOracle for OpenAiOracle {
    async fn assess(
        &self,
        a: &Profile,
        b: &Profile,
        deterministic: u8,
    ) -> Result<OracleAssessment, OracleError> {
        let prompt = build_prompt(a, b, deterministic);
        let text = self.complete(&prompt).await?;

        tracing::trace!("Oracle completion for {} / {}: {}", a.id, b.id, text);

        parse_assessment(&text)
    }
}

/// Build the natural-language prompt for a pair
pub fn build_prompt(a: &Profile, b: &Profile, deterministic: u8) -> String {
    format!(
        "Analyze the compatibility of these two dating profiles and provide scores for different aspects.\n\
         The four scores should add up to at most 50 points.\n\
         Their rule-based compatibility score is already {deterministic}/{DETERMINISTIC_POOL}.\n\n\
         Profile 1: {}\n\n\
         Profile 2: {}\n\n\
         Respond with a JSON object with the numeric keys \"occupation\", \"interests\", \"names\" \
         and \"personality\", and a string key \"explanation\" briefly explaining your scoring.",
        describe(a),
        describe(b),
    )
}

fn describe(profile: &Profile) -> String {
    format!(
        "{}, {}, {}, interested in {}, looking for {}, timeline to settle: {} months",
        profile.name,
        profile.age,
        profile.occupation,
        profile.interests,
        profile.looking_for.label(),
        profile.settle_timeline,
    )
}

/// Locate the brace-delimited payload inside free-form completion text
///
/// Returns the substring from the first `{` to the last `}` inclusive.
pub fn extract_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse completion text into validated sub-scores
pub fn parse_assessment(text: &str) -> Result<OracleAssessment, OracleError> {
    let payload = extract_payload(text)
        .ok_or_else(|| OracleError::Malformed("No structured payload in completion".into()))?;

    let parsed: AssessmentPayload = serde_json::from_str(payload)
        .map_err(|e| OracleError::Malformed(format!("Failed to parse payload: {}", e)))?;

    for (axis, value) in [
        ("occupation", parsed.occupation),
        ("interests", parsed.interests),
        ("names", parsed.names),
        ("personality", parsed.personality),
    ] {
        if !value.is_finite() || !(0.0..=AXIS_MAX).contains(&value) {
            return Err(OracleError::Malformed(format!("{} score out of range: {}", axis, value)));
        }
    }

    Ok(OracleAssessment {
        occupation: parsed.occupation,
        interests: parsed.interests,
        names: parsed.names,
        personality: parsed.personality,
        explanation: parsed.explanation.trim().to_string(),
    })
}
