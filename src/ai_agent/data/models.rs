use std::fmt;
use serde::{Serialize, Deserialize};


pub const MISSING_DATE: &str = "N/A";

/// Composite identity of a transcript. Ordering is ticker, then year, then quarter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranscriptKey {
  pub ticker: String,
  pub year: i32,
  pub quarter: u8,
}

impl TranscriptKey {
  pub fn new(ticker: &str, year: i32, quarter: u8) -> Self {
    TranscriptKey { ticker: ticker.to_string(), year, quarter }
  }
}

impl fmt::Display for TranscriptKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} FY{} Q{}", self.ticker, self.year, self.quarter)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
  pub ticker: String,
  pub year: i32,
  pub quarter: u8,
  pub content: String,
  pub date: String,
}

impl Transcript {
  pub fn key(&self) -> TranscriptKey {
    TranscriptKey::new(&self.ticker, self.year, self.quarter)
  }

  pub fn matches(&self, key: &TranscriptKey) -> bool {
    self.ticker == key.ticker && self.year == key.year && self.quarter == key.quarter
  }

  /// Display label, e.g. `ACME FY2024 Q1 (2024-04-25)`.
  pub fn label(&self) -> String {
    format!("{} FY{} Q{} ({})", self.ticker, self.year, self.quarter, self.date)
  }

  /// Button caption used inside a ticker group, without the ticker prefix.
  pub fn period_label(&self) -> String {
    format!("FY{} Q{} ({})", self.year, self.quarter, self.date)
  }
}

// Body returned by the transcript endpoint. Everything is optional so a partial
// body still deserializes; acceptance is decided by `into_transcript`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptResponse {
  pub transcript: Option<String>,
  pub date: Option<String>,
}

impl TranscriptResponse {
  pub fn into_transcript(self, ticker: &str, year: i32, quarter: u8) -> Option<Transcript> {
    // A blank transcript counts as missing, same as an absent key.
    let content: String = self.transcript.filter(|text| !text.trim().is_empty())?;
    let date: String = self.date
      .filter(|d| !d.trim().is_empty())
      .unwrap_or_else(|| MISSING_DATE.to_string());

    Some(Transcript { ticker: ticker.to_string(), year, quarter, content, date })
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
  pub question: String,
  pub answer: String,
  pub asked_at: chrono::DateTime<chrono::Utc>,
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_uses_ticker_year_quarter_and_date() {
    let transcript = Transcript {
      ticker: "ACME".to_string(), year: 2024, quarter: 2,
      content: "hello".to_string(), date: "2024-07-30".to_string(),
    };
    assert_eq!(transcript.label(), "ACME FY2024 Q2 (2024-07-30)");
    assert_eq!(transcript.period_label(), "FY2024 Q2 (2024-07-30)");
    assert_eq!(transcript.key(), TranscriptKey::new("ACME", 2024, 2));
  }

  #[test]
  fn response_without_transcript_is_rejected() {
    let body: TranscriptResponse = serde_json::from_str(r#"{"date": "2024-01-01"}"#).unwrap();
    assert!(body.into_transcript("ACME", 2024, 1).is_none());

    let empty: TranscriptResponse = serde_json::from_str(r#"{"transcript": "  "}"#).unwrap();
    assert!(empty.into_transcript("ACME", 2024, 1).is_none());
  }

  #[test]
  fn missing_date_defaults_to_na() {
    let body: TranscriptResponse = serde_json::from_str(r#"{"transcript": "Good morning"}"#).unwrap();
    let transcript = body.into_transcript("ACME", 2025, 3).unwrap();
    assert_eq!(transcript.date, MISSING_DATE);
    assert_eq!(transcript.content, "Good morning");
  }

  #[test]
  fn keys_order_by_ticker_then_period() {
    let mut keys = vec![
      TranscriptKey::new("ZZZ", 2024, 1),
      TranscriptKey::new("ACME", 2025, 1),
      TranscriptKey::new("ACME", 2024, 4),
    ];
    keys.sort();
    assert_eq!(keys[0], TranscriptKey::new("ACME", 2024, 4));
    assert_eq!(keys[2], TranscriptKey::new("ZZZ", 2024, 1));
  }
}
