use reqwest::header::{HeaderValue, HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use anyhow::{Context, Result};

pub const TRANSCRIPT_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone)]
pub struct TranscriptHeaderData {
  pub api_key : String,
}

impl TranscriptHeaderData {
  pub fn new(api_key: String) -> Self {
    TranscriptHeaderData { api_key: api_key }
  }

  pub fn to_header_map(&self) -> Result<HeaderMap> {
    let mut headers: HeaderMap = HeaderMap::new();
    let value: HeaderValue = HeaderValue::from_str(&self.api_key).context("Transcript API key is not a valid header value")?;
    headers.insert(TRANSCRIPT_KEY_HEADER, value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    return Ok(headers);
  }
}

#[derive(Debug, Clone)]
pub struct CompletionHeaderData {
  pub api_key : String,
}

impl CompletionHeaderData {
  pub fn new(api_key: String) -> Self {
    CompletionHeaderData { api_key: api_key }
  }

  pub fn to_header_map(&self) -> Result<HeaderMap> {
    let mut headers: HeaderMap = HeaderMap::new();
    let bearer: HeaderValue = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).context("Completion API key is not a valid header value")?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    return Ok(headers);
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn transcript_headers_carry_api_key() {
    let headers = TranscriptHeaderData::new("secret".to_string()).to_header_map().unwrap();
    assert_eq!(headers.get(TRANSCRIPT_KEY_HEADER).unwrap(), "secret");
    assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
  }

  #[test]
  fn completion_headers_use_bearer_auth() {
    let headers = CompletionHeaderData::new("sk-test".to_string()).to_header_map().unwrap();
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
  }

  #[test]
  fn newline_in_key_is_rejected() {
    assert!(TranscriptHeaderData::new("bad\nkey".to_string()).to_header_map().is_err());
  }
}
