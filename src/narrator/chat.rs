//! OpenAI-compatible chat narrator
//!
//! Works with any server exposing `POST {base_url}/chat/completions`
//! (x.ai, OpenAI, vLLM, llama-server, ...).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdvisoryContext, Narrator};
use crate::config::NarratorConfig;
use crate::error::NarrativeError;

const SYSTEM_PROMPT: &str = "You are a helpful, practical financial advisor for Indian families.";

#[derive(Clone)]
pub struct ChatNarrator {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl ChatNarrator {
    pub fn new(config: &NarratorConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// User prompt: the structured context plus the shape of answer expected.
pub fn build_prompt(context: &AdvisoryContext) -> Result<String, NarrativeError> {
    let facts = serde_json::to_string_pretty(context)?;
    Ok(format!(
        "You advise Indian middle-class families. Write in simple Hinglish (Hindi + English mix).\n\
         \n\
         User data and rule findings:\n\
         {facts}\n\
         \n\
         Risk zone: {zone}\n\
         \n\
         Provide:\n\
         1. Current situation summary (2 lines)\n\
         2. Top 3 immediate risks\n\
         3. Action steps for the next 30-90 days\n\
         4. Long-term suggestions\n\
         \n\
         Stay consistent with the rule findings. Be practical, non-technical and culturally relevant for India.",
        zone = context.risk_zone,
    ))
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Narrator for ChatNarrator {
    async fn narrate(&self, context: &AdvisoryContext) -> Result<String, NarrativeError> {
        let prompt = build_prompt(context)?;
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Api { status, body });
        }

        let reply: ChatCompletionResponse = response.json().await?;
        debug!(model = %self.model, choices = reply.choices.len(), "narrator replied");

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(NarrativeError::EmptyReply)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
