use reqwest::StatusCode;
use thiserror::Error;

use crate::ai_agent::data::models::TranscriptKey;

/// Failure talking to a third-party API (transcripts or completions).
#[derive(Error, Debug)]
pub enum UpstreamError {
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("authentication rejected with status {0}")]
  Authentication(StatusCode),

  #[error("upstream returned {status}: {body}")]
  Status { status: StatusCode, body: String },

  #[error("malformed response: {0}")]
  MalformedResponse(String),

  #[error("request could not be built: {0}")]
  Request(String),
}

impl UpstreamError {
  /// Maps a non-success status to its classified error.
  pub fn from_status(status: StatusCode, body: String) -> Self {
    match status {
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Authentication(status),
      _ => UpstreamError::Status { status, body },
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      UpstreamError::Network(_) => "network",
      UpstreamError::Authentication(_) => "authentication",
      UpstreamError::Status { .. } => "upstream_status",
      UpstreamError::MalformedResponse(_) => "malformed_response",
      UpstreamError::Request(_) => "request",
    }
  }
}

#[derive(Error, Debug)]
pub enum SessionError {
  #[error("{0}")]
  Validation(String),

  #[error("transcript {0} is not loaded")]
  UnknownTranscript(TranscriptKey),

  #[error("ticker {0} is not selected")]
  TickerNotSelected(String),

  #[error("select at least one transcript first")]
  NothingSelected,

  #[error("completion request failed: {0}")]
  Completion(#[source] UpstreamError),

  #[error("session runtime is not running")]
  RuntimeUnavailable,
}

impl SessionError {
  pub fn kind(&self) -> &'static str {
    match self {
      SessionError::Validation(_) => "validation",
      SessionError::UnknownTranscript(_) => "unknown_transcript",
      SessionError::TickerNotSelected(_) => "ticker_not_selected",
      SessionError::NothingSelected => "nothing_selected",
      SessionError::Completion(inner) => inner.kind(),
      SessionError::RuntimeUnavailable => "runtime_unavailable",
    }
  }
}
