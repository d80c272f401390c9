use crate::ai_agent::data::data::CompletionHeaderData;
use crate::ai_agent::error::UpstreamError;
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};

use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use async_trait::async_trait;


#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
  messages: &'a [ChatMessage],
  model: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  top_p: Option<f32>,
}

#[derive(Deserialize, Debug)]
struct CompletionMessage {
  content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
  message: CompletionMessage,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
  choices: Vec<CompletionChoice>,
}

/// Client for any endpoint speaking the OpenAI chat-completions protocol (OpenAI, Groq).
pub struct OpenAICompatibleProvider {
  client : Client
}

impl OpenAICompatibleProvider {

  pub fn new() -> Self {
    OpenAICompatibleProvider { client: Client::new() }
  }
}

pub fn parse_chat_response(body: &str) -> Result<LLMResponse, UpstreamError> {
  let parsed: ChatCompletionResponse = serde_json::from_str(body)
    .map_err(|e| UpstreamError::MalformedResponse(format!("completion body is not valid JSON: {}", e)))?;

  let first: CompletionChoice = parsed.choices.into_iter().next()
    .ok_or_else(|| UpstreamError::MalformedResponse("no response choices received".to_string()))?;

  match first.message.content {
    Some(content) if !content.trim().is_empty() => Ok(LLMResponse { content }),
    _ => Err(UpstreamError::MalformedResponse("first choice has no content".to_string())),
  }
}

#[async_trait]
impl LLMChatter for OpenAICompatibleProvider {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> Result<LLMResponse, UpstreamError> {
    let request = ChatCompletionRequest {
      messages: &messages,
      model: &config.model_name,
      temperature: config.temperature,
      max_tokens: config.max_tokens,
      top_p: config.top_p,
    };

    let headers: HeaderMap = CompletionHeaderData::new(config.api_key.clone()).to_header_map()
      .map_err(|e| UpstreamError::Request(e.to_string()))?;

    log::debug!("Sending {} messages to {} ({})", messages.len(), config.provider, config.model_name);
    let response: Response = self.client.post(&config.base_url).headers(headers).json(&request).send().await?;
    let status: StatusCode = response.status();
    let body: String = response.text().await?;

    if status.is_success() {
      return parse_chat_response(&body);
    }
    else {
      log::error!("Error getting response from {}: {}", config.provider, status);
      return Err(UpstreamError::from_status(status, body));
    }
  }
}
