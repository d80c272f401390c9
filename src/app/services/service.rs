use std::collections::BTreeSet;
use serde::Serialize;

use super::session_service::SessionService;
use crate::ai_agent::data::models::{ChatTurn, Transcript, TranscriptKey};
use crate::ai_agent::error::SessionError;
use crate::ai_agent::session::filter::{self, FilterCriteria, FilterOptions};
use crate::ai_agent::session::runtime::{normalize_ticker, ActionOutcome};
use crate::ai_agent::session::state::{SessionPhase, SessionState};
use crate::ai_agent::utils::tickers::{company_name, search_tickers, TickerEntry};

pub const NO_TICKERS_MESSAGE: &str = "No transcripts selected";
pub const NO_MATCHES_MESSAGE: &str = "No transcripts match the selected filters.";

#[derive(Debug, Clone, Serialize)]
pub struct TickerChip {
  pub ticker: String,
  pub company: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickerChoice {
  pub ticker: &'static str,
  pub company: &'static str,
  pub display_name: String,
}

impl From<&'static TickerEntry> for TickerChoice {
  fn from(entry: &'static TickerEntry) -> Self {
    TickerChoice { ticker: entry.ticker, company: entry.company, display_name: entry.display_name() }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptCard {
  pub key: TranscriptKey,
  pub label: String,
  pub caption: String,
  pub date: String,
  pub selected: bool,
  pub analyzed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptGroup {
  pub ticker: String,
  pub transcripts: Vec<TranscriptCard>,
}

/// Everything the page needs to render, derived from one session snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
  pub version: u64,
  pub phase: SessionPhase,
  pub selected_tickers: Vec<TickerChip>,
  pub search_query: String,
  pub filters: FilterCriteria,
  pub filters_active: bool,
  pub filter_options: FilterOptions,
  pub groups: Vec<TranscriptGroup>,
  pub message: Option<String>,
  pub selected_transcripts: Vec<String>,
  pub running_summary: String,
  pub chat_history: Vec<ChatTurn>,
  pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptDetail {
  pub key: TranscriptKey,
  pub label: String,
  pub date: String,
  pub content: String,
  pub selected: bool,
  pub analysis: Option<String>,
}

fn card(state: &SessionState, transcript: &Transcript) -> TranscriptCard {
  let key: TranscriptKey = transcript.key();
  TranscriptCard {
    selected: state.selected.contains(&key),
    analyzed: state.analyzed.contains(&key),
    label: transcript.label(),
    caption: transcript.period_label(),
    date: transcript.date.clone(),
    key,
  }
}

impl SessionView {
  pub fn build(state: &SessionState, notice: Option<String>) -> Self {
    let all: Vec<&Transcript> = state.all_transcripts();
    let searched: Vec<&Transcript> = filter::search_transcripts(&all, &state.search_query);
    let visible: Vec<&Transcript> = filter::filter_transcripts(&all, &state.search_query, &state.filters);

    let groups: Vec<TranscriptGroup> = filter::group_by_ticker(&visible)
      .into_iter()
      .map(|(ticker, members)| TranscriptGroup {
        ticker,
        transcripts: members.into_iter().map(|t| card(state, t)).collect(),
      })
      .collect();

    let message: Option<String> = if all.is_empty() {
      Some(NO_TICKERS_MESSAGE.to_string())
    } else if groups.is_empty() {
      Some(NO_MATCHES_MESSAGE.to_string())
    } else {
      None
    };

    SessionView {
      version: state.version,
      phase: state.phase(),
      selected_tickers: state.selected_tickers.iter()
        .map(|t| TickerChip { ticker: t.clone(), company: company_name(t) })
        .collect(),
      search_query: state.search_query.clone(),
      filters: state.filters.clone(),
      filters_active: !state.filters.is_empty() || !state.search_query.trim().is_empty(),
      filter_options: filter::filter_options(&searched),
      groups,
      message,
      selected_transcripts: state.selected_transcripts().iter().map(|t| t.label()).collect(),
      running_summary: state.running_summary.clone(),
      chat_history: state.chat_history.clone(),
      notice,
    }
  }

  pub fn from_outcome(outcome: ActionOutcome) -> Self {
    SessionView::build(&outcome.state, outcome.notice)
  }
}

/// Uppercases company symbols and rejects quarters outside 1..=4.
pub fn normalize_criteria(criteria: FilterCriteria) -> Result<FilterCriteria, SessionError> {
  if let Some(bad) = criteria.quarters.iter().find(|q| !(1..=4).contains(*q)) {
    return Err(SessionError::Validation(format!("quarter {} is not between 1 and 4", bad)));
  }
  let companies: BTreeSet<String> = criteria.companies.iter()
    .map(|c| c.trim().to_uppercase())
    .filter(|c| !c.is_empty())
    .collect();

  Ok(FilterCriteria { companies, ..criteria })
}

pub struct TranscriptServices {
  session_service : SessionService
}

impl TranscriptServices {

  pub fn new(session_service: SessionService) -> Self {
    TranscriptServices { session_service: session_service }
  }

  pub fn search_tickers(&self, query: Option<&str>, limit: Option<usize>) -> Vec<TickerChoice> {
    let limit: usize = limit.unwrap_or(20).clamp(1, 100);
    search_tickers(query.unwrap_or(""), limit).into_iter().map(TickerChoice::from).collect()
  }

  pub async fn view(&self) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.snapshot().await?))
  }

  pub async fn add_ticker(&self, ticker: &str) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.add_ticker(ticker.to_string()).await?))
  }

  pub async fn remove_ticker(&self, ticker: &str) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.remove_ticker(ticker.to_string()).await?))
  }

  pub async fn toggle_transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<SessionView, SessionError> {
    let key: TranscriptKey = TranscriptKey::new(&normalize_ticker(ticker)?, year, quarter);
    Ok(SessionView::from_outcome(self.session_service.toggle_transcript(key).await?))
  }

  pub async fn set_search(&self, query: Option<String>) -> Result<SessionView, SessionError> {
    let query: String = query.unwrap_or_default().trim().to_string();
    Ok(SessionView::from_outcome(self.session_service.set_search(query).await?))
  }

  pub async fn set_filters(&self, criteria: FilterCriteria) -> Result<SessionView, SessionError> {
    let criteria: FilterCriteria = normalize_criteria(criteria)?;
    Ok(SessionView::from_outcome(self.session_service.set_filters(criteria).await?))
  }

  pub async fn clear_filters(&self) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.set_filters(FilterCriteria::default()).await?))
  }

  pub async fn analyze(&self) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.analyze().await?))
  }

  pub async fn ask(&self, question: &str) -> Result<SessionView, SessionError> {
    Ok(SessionView::from_outcome(self.session_service.ask(question.to_string()).await?))
  }

  pub async fn transcript(&self, ticker: &str, year: i32, quarter: u8) -> Result<TranscriptDetail, SessionError> {
    let key: TranscriptKey = TranscriptKey::new(&normalize_ticker(ticker)?, year, quarter);
    let state: SessionState = self.session_service.snapshot().await?.state;
    let transcript: &Transcript = state.find(&key).ok_or_else(|| SessionError::UnknownTranscript(key.clone()))?;

    Ok(TranscriptDetail {
      label: transcript.label(),
      date: transcript.date.clone(),
      content: transcript.content.clone(),
      selected: state.selected.contains(&key),
      analysis: state.analyzed.get(&key).map(String::from),
      key,
    })
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai_agent::session::state::SessionEvent;

  fn transcript(ticker: &str, quarter: u8, content: &str) -> Transcript {
    Transcript { ticker: ticker.to_string(), year: 2024, quarter, content: content.to_string(), date: "N/A".to_string() }
  }

  fn state() -> SessionState {
    SessionState::new()
      .apply(SessionEvent::TickerLoaded { ticker: "BOLT".to_string(), transcripts: vec![transcript("BOLT", 1, "bolts")] })
      .apply(SessionEvent::TickerLoaded {
        ticker: "ACME".to_string(),
        transcripts: vec![transcript("ACME", 1, "widgets"), transcript("ACME", 2, "more widgets")],
      })
      .apply(SessionEvent::SelectionToggled(TranscriptKey::new("ACME", 2024, 2)))
  }

  #[test]
  fn empty_session_says_nothing_selected() {
    let view = SessionView::build(&SessionState::new(), None);
    assert_eq!(view.message.as_deref(), Some(NO_TICKERS_MESSAGE));
    assert!(view.groups.is_empty());
  }

  #[test]
  fn groups_follow_ticker_selection_order_and_mark_selection() {
    let view = SessionView::build(&state(), None);
    let tickers: Vec<&str> = view.groups.iter().map(|g| g.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["BOLT", "ACME"]);
    assert!(view.groups[1].transcripts[1].selected);
    assert!(!view.groups[1].transcripts[0].selected);
    assert_eq!(view.selected_transcripts, vec!["ACME FY2024 Q2 (N/A)"]);
    assert!(view.message.is_none());
  }

  #[test]
  fn filters_hiding_everything_produce_notice() {
    let state = state().apply(SessionEvent::SearchChanged("nothing like this".to_string()));
    let view = SessionView::build(&state, None);
    assert!(view.groups.is_empty());
    assert!(view.filters_active);
    assert_eq!(view.message.as_deref(), Some(NO_MATCHES_MESSAGE));
  }

  #[test]
  fn filter_options_come_from_search_results() {
    let state = state().apply(SessionEvent::SearchChanged("widgets".to_string()));
    let view = SessionView::build(&state, None);
    assert_eq!(view.filter_options.companies, vec!["ACME"]);
    assert_eq!(view.filter_options.quarters, vec![1, 2]);
  }

  #[test]
  fn criteria_are_normalized_and_checked() {
    let criteria = FilterCriteria { companies: BTreeSet::from([" acme ".to_string()]), ..FilterCriteria::default() };
    assert_eq!(normalize_criteria(criteria).unwrap().companies, BTreeSet::from(["ACME".to_string()]));

    let bad = FilterCriteria { quarters: BTreeSet::from([5]), ..FilterCriteria::default() };
    assert_eq!(normalize_criteria(bad).unwrap_err().kind(), "validation");
  }
}
