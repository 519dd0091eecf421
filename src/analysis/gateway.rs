use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::{SYSTEM_PROMPT, USER_PROMPT};
use super::types::VisionGateway;
use super::AnalysisError;

/// Client for an OpenAI-compatible chat completions gateway
/// fronting a hosted vision-language model.
pub struct AiGatewayClient {
    url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AiGatewayClient {
    pub fn new(
        url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

// ──────────────────────────────────────────────
// Chat completions wire format
// ──────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, image_data_url: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(SYSTEM_PROMPT),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: USER_PROMPT },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_data_url },
                    },
                ]),
            },
        ],
    }
}

/// Map a non-success gateway status to an analysis error.
pub fn map_gateway_status(status: u16, body: String) -> AnalysisError {
    match status {
        429 => AnalysisError::RateLimited,
        402 => AnalysisError::QuotaExceeded,
        _ => AnalysisError::Gateway { status, body },
    }
}

fn first_choice_content(response: ChatResponse) -> Result<String, AnalysisError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(AnalysisError::NoContent)
}

impl VisionGateway for AiGatewayClient {
    fn analyze_image(&self, image_data_url: &str) -> Result<String, AnalysisError> {
        let body = build_request(&self.model, image_data_url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AnalysisError::Connection(self.url.clone())
                } else if e.is_timeout() {
                    AnalysisError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    AnalysisError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "AI gateway request failed");
            return Err(map_gateway_status(status.as_u16(), body));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;

        first_choice_content(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock gateway for testing — returns a canned reply or a canned failure.
pub struct MockVisionGateway {
    reply: Result<String, u16>,
}

impl MockVisionGateway {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
        }
    }

    /// Fail every call as if the gateway answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self { reply: Err(status) }
    }
}

impl VisionGateway for MockVisionGateway {
    fn analyze_image(&self, _image_data_url: &str) -> Result<String, AnalysisError> {
        match &self.reply {
            Ok(reply) if reply.is_empty() => Err(AnalysisError::NoContent),
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(map_gateway_status(*status, String::new())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
