//! Chat-completion fallback for point classification.

use std::time::Duration;

use anyhow::Context as _;
use hoopsim_engine::{ClassifyError, PointClassifier};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Asks an OpenAI chat model for the point value of a play description.
#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    http: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    fn prompt(text: &str) -> String {
        format!(
            "Calculate the points for this play description. \n\nExample 1:\nText: makes jump bank shot\nPoint: 2\n\nText: {}\nPoints:",
            text.to_lowercase()
        )
    }
}

impl PointClassifier for OpenAiClassifier {
    fn classify(&self, text: &str) -> Result<u8, ClassifyError> {
        let prompt = Self::prompt(text);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: 4,
        };

        debug!(model = %self.model, text, "requesting point classification");
        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|err| ClassifyError::new(format!("request failed: {err}")))?;
        let response: ChatResponse = response
            .json()
            .map_err(|err| ClassifyError::new(format!("invalid response: {err}")))?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClassifyError::new("empty response"))?;
        parse_reply(&reply)
    }
}

/// The first integer in the model's reply.
fn parse_reply(reply: &str) -> Result<u8, ClassifyError> {
    reply
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ClassifyError::new(format!("no point value in reply `{reply}`")))
}
