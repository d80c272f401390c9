use std::env;
use std::str::FromStr;
use anyhow::{anyhow, Context, Result};

use crate::ai_agent::llm::model_provider::{LLMModelConfig, ModelProvider};
use crate::ai_agent::tools::api::DEFAULT_YEARS;

pub const DEFAULT_TRANSCRIPTS_URL: &str = "https://api.api-ninjas.com/v1/earningstranscript";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Clone, Debug)]
pub struct Config {
  pub transcripts_api_key: String,
  pub transcripts_base_url: String,
  pub transcript_years: Vec<i32>,
  pub completion_api_key: String,
  pub completion_provider: ModelProvider,
  pub completion_url: String,
  pub completion_model: String,
  pub bind_host: String,
  pub bind_port: u16,
}

fn required(lookup: &dyn Fn(&str) -> Option<String>, names: &[&str]) -> Result<String> {
  for name in names {
    if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
      return Ok(value.trim().to_string());
    }
  }
  Err(anyhow!("Missing required environment variable {}", names[0]))
}

fn optional(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
  lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_years(raw: &str) -> Result<Vec<i32>> {
  let years: Vec<i32> = raw.split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| s.parse::<i32>().with_context(|| format!("TRANSCRIPT_YEARS entry '{}' is not a year", s)))
    .collect::<Result<Vec<i32>>>()?;

  if years.is_empty() {
    return Err(anyhow!("TRANSCRIPT_YEARS must list at least one year"));
  }
  return Ok(years);
}

impl Config {

  /// Reads `.env` and the process environment. Fails when a secret is missing.
  pub fn load() -> Result<Self> {
    match dotenv::dotenv() {
      Ok(path) => log::info!("Loaded .env file from {}", path.display()),
      Err(_) => log::info!("No .env file found, using process environment"),
    }

    Config::from_lookup(|name| env::var(name).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self> where F: Fn(&str) -> Option<String> {
    let transcripts_api_key: String = required(&lookup, &["TRANSCRIPTS_API_KEY"])?;
    let completion_api_key: String = required(&lookup, &["OPEN_AI_API_KEY", "OPENAI_API_KEY"])?;

    let completion_provider: ModelProvider = match optional(&lookup, "COMPLETION_PROVIDER") {
      Some(raw) => ModelProvider::from_str(&raw).map_err(|e| anyhow!(e))?,
      None => ModelProvider::OpenAI,
    };

    let completion_url: String = optional(&lookup, "COMPLETION_URL")
      .unwrap_or_else(|| completion_provider.default_url().to_string());
    let completion_model: String = optional(&lookup, "COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let transcripts_base_url: String = optional(&lookup, "TRANSCRIPTS_BASE_URL").unwrap_or_else(|| DEFAULT_TRANSCRIPTS_URL.to_string());

    let transcript_years: Vec<i32> = match optional(&lookup, "TRANSCRIPT_YEARS") {
      Some(raw) => parse_years(&raw)?,
      None => DEFAULT_YEARS.to_vec(),
    };

    let bind_host: String = optional(&lookup, "BIND_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let bind_port: u16 = match optional(&lookup, "BIND_PORT") {
      Some(raw) => raw.parse::<u16>().with_context(|| format!("BIND_PORT '{}' is not a port number", raw))?,
      None => 8080,
    };

    return Ok(Config {
      transcripts_api_key, transcripts_base_url, transcript_years,
      completion_api_key, completion_provider, completion_url, completion_model,
      bind_host, bind_port,
    });
  }

  pub fn model_config(&self) -> LLMModelConfig {
    LLMModelConfig {
      provider: self.completion_provider.clone(),
      model_name: self.completion_model.clone(),
      api_key: self.completion_api_key.clone(),
      base_url: self.completion_url.clone(),
      temperature: None,
      max_tokens: None,
      top_p: None,
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name: &str| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_secrets_are_set() {
    let config = Config::from_lookup(lookup_from(&[("TRANSCRIPTS_API_KEY", "t"), ("OPEN_AI_API_KEY", "o")])).unwrap();
    assert_eq!(config.transcripts_base_url, DEFAULT_TRANSCRIPTS_URL);
    assert_eq!(config.transcript_years, vec![2024, 2025]);
    assert_eq!(config.completion_provider, ModelProvider::OpenAI);
    assert_eq!(config.completion_url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(config.completion_model, "gpt-4o");
    assert_eq!(config.bind_port, 8080);
  }

  #[test]
  fn missing_transcript_key_names_the_variable() {
    let err = Config::from_lookup(lookup_from(&[("OPEN_AI_API_KEY", "o")])).unwrap_err();
    assert!(err.to_string().contains("TRANSCRIPTS_API_KEY"));
  }

  #[test]
  fn blank_completion_key_is_missing() {
    let err = Config::from_lookup(lookup_from(&[("TRANSCRIPTS_API_KEY", "t"), ("OPEN_AI_API_KEY", "  ")])).unwrap_err();
    assert!(err.to_string().contains("OPEN_AI_API_KEY"));
  }

  #[test]
  fn openai_api_key_is_accepted_as_fallback() {
    let config = Config::from_lookup(lookup_from(&[("TRANSCRIPTS_API_KEY", "t"), ("OPENAI_API_KEY", "o")])).unwrap();
    assert_eq!(config.completion_api_key, "o");
  }

  #[test]
  fn groq_provider_switches_default_url() {
    let config = Config::from_lookup(lookup_from(&[
      ("TRANSCRIPTS_API_KEY", "t"), ("OPEN_AI_API_KEY", "o"),
      ("COMPLETION_PROVIDER", "groq"), ("TRANSCRIPT_YEARS", "2023, 2024,2025"),
    ])).unwrap();
    assert_eq!(config.completion_url, ModelProvider::Groq.default_url());
    assert_eq!(config.transcript_years, vec![2023, 2024, 2025]);
    assert_eq!(config.model_config().provider, ModelProvider::Groq);
  }

  #[test]
  fn bad_years_fail_fast() {
    assert!(Config::from_lookup(lookup_from(&[
      ("TRANSCRIPTS_API_KEY", "t"), ("OPEN_AI_API_KEY", "o"), ("TRANSCRIPT_YEARS", "twenty"),
    ])).is_err());
  }
}
