use crate::ai_agent::data::models::{Transcript, TranscriptResponse};
use crate::ai_agent::data::data::TranscriptHeaderData;
use crate::ai_agent::error::UpstreamError;
use crate::app::config::Config;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use reqwest::header::HeaderMap;
use serde_json::Value;


pub const QUARTERS: [u8; 4] = [1, 2, 3, 4];
pub const DEFAULT_YEARS: [i32; 2] = [2024, 2025];

/// Anything that can return the transcript of one earnings call.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
  /// `Ok(None)` means the provider answered but has no transcript for that period.
  async fn get_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<Option<Transcript>, UpstreamError>;
}

pub struct TranscriptAPI {
  base_url: String,
  api_key: String,
  client: Client,
}

impl TranscriptAPI {
  pub fn new(config: &Config) -> Self {
    TranscriptAPI {
      base_url: config.transcripts_base_url.clone(),
      api_key: config.transcripts_api_key.clone(),
      client: Client::new(),
    }
  }
}

/// Turns a successful response body into a transcript, if it carries one.
pub fn parse_transcript_body(body: &str, ticker: &str, year: i32, quarter: u8) -> Result<Option<Transcript>, UpstreamError> {
  let value: Value = serde_json::from_str(body)
    .map_err(|e| UpstreamError::MalformedResponse(format!("transcript body for {} FY{} Q{} is not JSON: {}", ticker, year, quarter, e)))?;

  // The provider answers `[]` or `{}` for periods it has nothing for.
  if !value.is_object() {
    return Ok(None);
  }

  let response: TranscriptResponse = serde_json::from_value(value)
    .map_err(|e| UpstreamError::MalformedResponse(format!("unexpected transcript shape: {}", e)))?;

  return Ok(response.into_transcript(ticker, year, quarter));
}

#[async_trait]
impl TranscriptSource for TranscriptAPI {
  async fn get_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<Option<Transcript>, UpstreamError> {
    let headers: HeaderMap = TranscriptHeaderData::new(self.api_key.clone()).to_header_map()
      .map_err(|e| UpstreamError::Request(e.to_string()))?;

    let year_param: String = year.to_string();
    let quarter_param: String = quarter.to_string();
    log::debug!("Requesting transcript {} FY{} Q{} from {}", ticker, year, quarter, self.base_url);

    let response: Response = self.client
      .get(&self.base_url)
      .query(&[("ticker", ticker), ("year", year_param.as_str()), ("quarter", quarter_param.as_str())])
      .headers(headers)
      .send()
      .await?;

    let status: StatusCode = response.status();
    let body: String = response.text().await?;

    if status.is_success() {
      return parse_transcript_body(&body, ticker, year, quarter);
    }
    else {
      return Err(UpstreamError::from_status(status, body));
    }
  }
}

/// Fetches every (year, quarter) pair for `ticker`, in grid order.
/// Failed or empty periods are skipped; the result may be empty.
pub async fn fetch_transcripts_for_ticker(source: &dyn TranscriptSource, ticker: &str, years: &[i32]) -> Vec<Transcript> {
  let mut transcripts: Vec<Transcript> = Vec::new();

  for &year in years {
    for &quarter in QUARTERS.iter() {
      match source.get_transcript(ticker, year, quarter).await {
        Ok(Some(transcript)) => transcripts.push(transcript),
        Ok(None) => {
          log::debug!("No transcript for {} FY{} Q{}", ticker, year, quarter);
        }
        Err(e) => {
          log::warn!("Skipping {} FY{} Q{} ({}): {}", ticker, year, quarter, e.kind(), e);
        }
      }
    }
  }

  log::info!("Fetched {} transcripts for {}", transcripts.len(), ticker);
  return transcripts;
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  struct GridSource {
    available: Vec<(i32, u8)>,
    calls: Mutex<Vec<(String, i32, u8)>>,
  }

  #[async_trait]
  impl TranscriptSource for GridSource {
    async fn get_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<Option<Transcript>, UpstreamError> {
      self.calls.lock().unwrap().push((ticker.to_string(), year, quarter));
      if quarter == 4 {
        return Err(UpstreamError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()));
      }
      if self.available.contains(&(year, quarter)) {
        let body = format!(r#"{{"transcript": "{} call {} {}", "date": "{}-0{}-15"}}"#, ticker, year, quarter, year, quarter * 3);
        return parse_transcript_body(&body, ticker, year, quarter);
      }
      Ok(None)
    }
  }

  #[tokio::test]
  async fn requests_full_grid_and_skips_failures() {
    let source = GridSource { available: vec![(2024, 1), (2024, 2), (2025, 3), (2025, 4)], calls: Mutex::new(Vec::new()) };
    let transcripts = fetch_transcripts_for_ticker(&source, "ACME", &DEFAULT_YEARS).await;

    assert_eq!(source.calls.lock().unwrap().len(), 8);
    let periods: Vec<(i32, u8)> = transcripts.iter().map(|t| (t.year, t.quarter)).collect();
    assert_eq!(periods, vec![(2024, 1), (2024, 2), (2025, 3)]);
    assert_eq!(transcripts[0].date, "2024-03-15");
  }

  #[tokio::test]
  async fn ticker_without_data_yields_nothing() {
    let source = GridSource { available: Vec::new(), calls: Mutex::new(Vec::new()) };
    let transcripts = fetch_transcripts_for_ticker(&source, "NOPE", &DEFAULT_YEARS).await;
    assert!(transcripts.is_empty());
  }

  #[test]
  fn empty_array_body_means_no_transcript() {
    assert!(parse_transcript_body("[]", "ACME", 2024, 1).unwrap().is_none());
    assert!(parse_transcript_body("{}", "ACME", 2024, 1).unwrap().is_none());
  }

  #[test]
  fn garbage_body_is_malformed() {
    let err = parse_transcript_body("not json", "ACME", 2024, 1).unwrap_err();
    assert_eq!(err.kind(), "malformed_response");
  }

  #[test]
  fn non_string_transcript_is_malformed() {
    let err = parse_transcript_body(r#"{"transcript": 42}"#, "ACME", 2024, 1).unwrap_err();
    assert_eq!(err.kind(), "malformed_response");
  }
}
