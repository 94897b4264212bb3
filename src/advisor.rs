/// Tactical-advice client.
///
/// Turns a gameplay event into one short radio line from the commander.
/// `get_advice` never fails: service problems are logged and replaced with
/// fixed fallback lines so the commander panel always has something to say.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::AdviceError;

/// Shown when the service answers with no text.
pub const EMPTY_FALLBACK: &str = "Keep your eyes open, pilot.";
/// Shown when the request fails outright.
pub const ERROR_FALLBACK: &str = "Comms disrupted. Continue the engagement.";

pub const TEMPERATURE: f32 = 0.8;
pub const TOP_P: f32 = 0.9;

/// One advice request as handed to an `Advisor`.
#[derive(Clone, Debug, PartialEq)]
pub struct AdviceRequest {
    pub event: String,
    pub score: u32,
    pub health: i32,
}

/// A source of commander lines.
pub trait Advisor: Send + Sync + 'static {
    /// Raw generated text.  May be empty.
    fn advise(
        &self,
        request: &AdviceRequest,
    ) -> impl Future<Output = Result<String, AdviceError>> + Send;
}

/// Ask `advisor` for a line about `event`, substituting a fallback on
/// empty output or failure.
pub async fn get_advice<A: Advisor>(
    advisor: &A,
    event: &str,
    score: u32,
    health: i32,
) -> String {
    let request = AdviceRequest {
        event: event.to_string(),
        score,
        health,
    };
    match advisor.advise(&request).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                EMPTY_FALLBACK.to_string()
            } else {
                text.to_string()
            }
        }
        Err(err) => {
            error!(%err, event, "tactical advice request failed");
            ERROR_FALLBACK.to_string()
        }
    }
}

/// Prompt sent to the generative model.
pub fn build_prompt(request: &AdviceRequest, language: &str) -> String {
    format!(
        "You are a futuristic tactical flight commander. Provide a short, one-sentence radio \
         message in {language} for the pilot based on this event: \"{}\". Current Score: {}, \
         Health: {}%. Keep it immersive, cool, and brief. No markdown.",
        request.event, request.score, request.health
    )
}

// ── Gemini wire format ────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: Vec<OutgoingPart<'a>>,
}

#[derive(Serialize, Debug)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Deserialize, Debug, Default)]
struct IncomingPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate; empty if none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Request body for `generateContent`.
pub fn request_body(prompt: &str) -> serde_json::Value {
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![OutgoingPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
        },
    };
    serde_json::to_value(body).unwrap_or_default()
}

// ── Gemini client ─────────────────────────────────────────────────────────────

/// Advisor backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
    language: String,
}

impl GeminiAdvisor {
    pub fn new(config: &Config) -> Result<Self, AdviceError> {
        let client = reqwest::Client::builder()
            .timeout(config.advice_timeout)
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint, config.model
            ),
            language: config.language.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn generate(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        let api_key = self.api_key.as_deref().ok_or(AdviceError::MissingApiKey)?;
        let prompt = build_prompt(request, &self.language);

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdviceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text();
        debug!(chars = text.len(), "tactical advice received");
        Ok(text)
    }
}

impl Advisor for GeminiAdvisor {
    fn advise(
        &self,
        request: &AdviceRequest,
    ) -> impl Future<Output = Result<String, AdviceError>> + Send {
        self.generate(request)
    }
}
