use std::sync::Arc;

use crate::ai_agent::error::SessionError;
use crate::ai_agent::session::filter::FilterCriteria;
use crate::app::services::service::{SessionView, TickerChoice, TranscriptDetail, TranscriptServices};

pub struct SessionController {
  services : Arc<TranscriptServices>
}

fn logged<T>(operation: &str, result: Result<T, SessionError>) -> Result<T, SessionError> {
  if let Err(e) = &result {
    match e {
      SessionError::Completion(_) | SessionError::RuntimeUnavailable => log::error!("{} failed ({}): {}", operation, e.kind(), e),
      _ => log::info!("{} rejected ({}): {}", operation, e.kind(), e),
    }
  }
  result
}

impl SessionController {
  pub fn new(services: Arc<TranscriptServices>) -> Self {
    SessionController {services: services}
  }

  pub fn search_tickers(&self, query: Option<&str>, limit: Option<usize>) -> Vec<TickerChoice> {
    self.services.search_tickers(query, limit)
  }

  pub async fn get_session(&self) -> Result<SessionView, SessionError> {
    logged("get_session", self.services.view().await)
  }

  pub async fn add_ticker(&self, ticker: &str) -> Result<SessionView, SessionError> {
    let result = self.services.add_ticker(ticker).await;
    if let Ok(view) = &result {
      if let Some(notice) = &view.notice {
        log::warn!("add_ticker {}: {}", ticker, notice);
      }
    }
    logged("add_ticker", result)
  }

  pub async fn remove_ticker(&self, ticker: &str) -> Result<SessionView, SessionError> {
    logged("remove_ticker", self.services.remove_ticker(ticker).await)
  }

  pub async fn toggle_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<SessionView, SessionError> {
    logged("toggle_transcript", self.services.toggle_transcript(ticker, year, quarter).await)
  }

  pub async fn set_search(&self, query: Option<String>) -> Result<SessionView, SessionError> {
    logged("set_search", self.services.set_search(query).await)
  }

  pub async fn set_filters(&self, criteria: FilterCriteria) -> Result<SessionView, SessionError> {
    logged("set_filters", self.services.set_filters(criteria).await)
  }

  pub async fn clear_filters(&self) -> Result<SessionView, SessionError> {
    logged("clear_filters", self.services.clear_filters().await)
  }

  pub async fn get_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<TranscriptDetail, SessionError> {
    logged("get_transcript", self.services.transcript(ticker, year, quarter).await)
  }

  pub async fn analyze(&self) -> Result<SessionView, SessionError> {
    logged("analyze", self.services.analyze().await)
  }

  pub async fn ask(&self, question: &str) -> Result<SessionView, SessionError> {
    logged("ask", self.services.ask(question).await)
  }

}
