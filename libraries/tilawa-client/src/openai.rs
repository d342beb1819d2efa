//! Natural-language range parsing through OpenAI chat completions.

use crate::error::{ClientError, Result};
use crate::http;
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiConfig, RangeFields,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tilawa_core::{PlaybackRange, RangeParser};
use tracing::{debug, info};

const INSTRUCTION: &str =
    "Take the following request for a surah/ayah repeat configuration and output an object representing it.";

/// Asks a chat model to turn free-form text into a playback range
///
/// The model is constrained to a JSON schema of the five range fields, and
/// the result is validated before it is returned.
#[derive(Clone)]
pub struct OpenAiRangeParser {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiRangeParser {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        Ok(Self {
            http: http::build_http()?,
            base_url: http::normalize_url(&config.base_url)?,
            api_key: config.api_key,
            model: config.model,
        })
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for the raw range fields
    pub async fn request_fields(&self, text: &str) -> Result<RangeFields> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Requesting range from model");

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt(text),
            }],
            temperature: 1.0,
            top_p: 1.0,
            max_tokens: 2048,
            response_format: response_format(),
        };

        let response =
            http::send(self.http.post(&url).bearer_auth(&self.api_key).json(&body)).await?;
        let completion: ChatCompletionResponse =
            http::decode(response, "chat completion").await?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::ParseError("Completion has no choices".into()))?
            .message;

        if let Some(refusal) = reply.refusal {
            return Err(ClientError::ParseError(format!(
                "Model refused request: {}",
                refusal
            )));
        }
        let content = reply
            .content
            .ok_or_else(|| ClientError::ParseError("Completion has no content".into()))?;

        serde_json::from_str(&content)
            .map_err(|e| ClientError::ParseError(format!("Model output is not a range: {}", e)))
    }

    /// Parse text into a validated range
    pub async fn parse(&self, text: &str) -> Result<PlaybackRange> {
        let range = self.request_fields(text).await?.into_range()?;
        info!(
            surah = range.surah(),
            start = range.start_ayah(),
            end = range.end_ayah(),
            "Parsed range request"
        );
        Ok(range)
    }
}

impl std::fmt::Debug for OpenAiRangeParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiRangeParser")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RangeParser for OpenAiRangeParser {
    async fn parse_range(&self, text: &str) -> tilawa_core::Result<PlaybackRange> {
        self.parse(text).await.map_err(ClientError::into_range_error)
    }
}

fn prompt(text: &str) -> String {
    format!("{}\n\nRequest:\n{}", INSTRUCTION, text)
}

fn response_format() -> serde_json::Value {
    let integer = json!({ "type": "integer" });
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "repeat_configuration",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "surah": integer,
                    "startAyah": integer,
                    "endAyah": integer,
                    "repeatAyahCount": integer,
                    "repeatRangeCount": integer,
                },
                "required": [
                    "surah",
                    "startAyah",
                    "endAyah",
                    "repeatAyahCount",
                    "repeatRangeCount"
                ],
                "additionalProperties": false
            }
        }
    })
}
