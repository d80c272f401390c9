use serde::{Serialize, Deserialize};
use std::str::FromStr;
use std::fmt;
use async_trait::async_trait;

use crate::ai_agent::error::UpstreamError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelProvider {
  Groq,
  OpenAI,
}

impl ModelProvider {

  pub fn default_url(&self) -> &'static str {
    match self {
      &ModelProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
      &ModelProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModelConfig {
  pub provider: ModelProvider,
  pub model_name: String,
  pub api_key: String,
  pub base_url: String,
  pub temperature: Option<f32>,
  pub max_tokens: Option<u32>,
  pub top_p : Option<f32>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String, // "system", "user" or "assistant"
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: &str) -> Self {
    ChatMessage { role: "system".to_string(), content: content.to_string() }
  }

  pub fn user(content: &str) -> Self {
    ChatMessage { role: "user".to_string(), content: content.to_string() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
  pub content: String,
}

impl fmt::Display for ModelProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModelProvider::Groq => write!(f, "Groq"),
      ModelProvider::OpenAI => write!(f, "OpenAI"),
    }
  }
}

impl FromStr for ModelProvider {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "groq" => Ok(ModelProvider::Groq),
      "openai" => Ok(ModelProvider::OpenAI),
      _ => Err(format!("Unknown model provider: {}", s)),
    }
  }
}

#[async_trait]
pub trait LLMChatter : Send + Sync {
  async fn chat(&self, messages: Vec<ChatMessage>, config : &LLMModelConfig) -> Result<LLMResponse, UpstreamError>;
}
