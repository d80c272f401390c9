use std::collections::{BTreeSet, HashMap};
use serde::Serialize;

use crate::ai_agent::data::cache::AnalysisCache;
use crate::ai_agent::data::models::{ChatTurn, Transcript, TranscriptKey};
use crate::ai_agent::session::filter::{self, FilterCriteria};

/// Coarse position of a session in the fetch -> select -> analyze -> chat flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
  Empty,
  TickersSelected,
  TranscriptsFetched,
  TranscriptsSelected,
  Analyzed,
  Chatting,
}

/// Everything a session changes. Only `apply` produces new values.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
  pub version: u64,
  pub selected_tickers: Vec<String>,
  pub transcripts_by_ticker: HashMap<String, Vec<Transcript>>,
  pub selected: BTreeSet<TranscriptKey>,
  pub analyzed: AnalysisCache,
  pub chat_history: Vec<ChatTurn>,
  pub running_summary: String,
  pub filters: FilterCriteria,
  pub search_query: String,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
  TickerLoaded { ticker: String, transcripts: Vec<Transcript> },
  TickerRemoved(String),
  SelectionToggled(TranscriptKey),
  SearchChanged(String),
  FiltersChanged(FilterCriteria),
  AnalysisCompleted { keys: Vec<TranscriptKey>, summary: String },
  ChatAnswered(ChatTurn),
}

impl SessionState {
  pub fn new() -> Self {
    SessionState::default()
  }

  /// Returns the state after `event`. `self` is left untouched.
  pub fn apply(&self, event: SessionEvent) -> SessionState {
    let mut next: SessionState = self.clone();
    if next.reduce(event) {
      next.version += 1;
    }
    return next;
  }

  // Returns false when the event does not change anything.
  fn reduce(&mut self, event: SessionEvent) -> bool {
    match event {
      SessionEvent::TickerLoaded { ticker, transcripts } => {
        if transcripts.is_empty() || self.has_ticker(&ticker) {
          log::debug!("Ignoring load for {}: already present or no transcripts", ticker);
          return false;
        }
        self.selected_tickers.push(ticker.clone());
        self.transcripts_by_ticker.insert(ticker, transcripts);
        true
      }
      SessionEvent::TickerRemoved(ticker) => {
        if !self.has_ticker(&ticker) {
          return false;
        }
        self.selected_tickers.retain(|t| *t != ticker);
        self.transcripts_by_ticker.remove(&ticker);
        self.selected.retain(|key| key.ticker != ticker);
        self.filters.companies.remove(&ticker);

        if self.transcripts_by_ticker.is_empty() {
          log::debug!("Last ticker removed, clearing chat and analysis");
          self.chat_history.clear();
          self.running_summary.clear();
          self.analyzed.clear();
        }
        true
      }
      SessionEvent::SelectionToggled(key) => {
        if self.find(&key).is_none() {
          log::warn!("Ignoring toggle of {}: transcript not loaded", key);
          return false;
        }
        filter::toggle(&mut self.selected, key);
        true
      }
      SessionEvent::SearchChanged(query) => {
        if self.search_query == query {
          return false;
        }
        self.search_query = query;
        true
      }
      SessionEvent::FiltersChanged(criteria) => {
        if self.filters == criteria {
          return false;
        }
        self.filters = criteria;
        true
      }
      SessionEvent::AnalysisCompleted { keys, summary } => {
        let written: usize = self.analyzed.record(&keys, &summary);
        if written == 0 {
          return false;
        }
        if !self.running_summary.is_empty() {
          self.running_summary.push_str("\n\n");
        }
        self.running_summary.push_str(summary.trim());
        true
      }
      SessionEvent::ChatAnswered(turn) => {
        self.chat_history.push(turn);
        true
      }
    }
  }

  pub fn has_ticker(&self, ticker: &str) -> bool {
    self.selected_tickers.iter().any(|t| t == ticker)
  }

  /// All transcripts, tickers in selection order.
  pub fn all_transcripts(&self) -> Vec<&Transcript> {
    self.selected_tickers.iter()
      .filter_map(|ticker| self.transcripts_by_ticker.get(ticker))
      .flat_map(|list| list.iter())
      .collect()
  }

  pub fn find(&self, key: &TranscriptKey) -> Option<&Transcript> {
    self.transcripts_by_ticker.get(&key.ticker)?.iter().find(|t| t.matches(key))
  }

  pub fn selected_transcripts(&self) -> Vec<&Transcript> {
    self.selected.iter().filter_map(|key| self.find(key)).collect()
  }

  /// Selected transcripts that have not been analyzed yet, in key order.
  pub fn pending_analysis(&self) -> Vec<&Transcript> {
    self.selected.iter()
      .filter(|key| !self.analyzed.contains(key))
      .filter_map(|key| self.find(key))
      .collect()
  }

  pub fn phase(&self) -> SessionPhase {
    if self.selected_tickers.is_empty() {
      return SessionPhase::Empty;
    }
    if self.transcripts_by_ticker.is_empty() {
      return SessionPhase::TickersSelected;
    }
    if self.selected.is_empty() {
      return SessionPhase::TranscriptsFetched;
    }
    if !self.chat_history.is_empty() {
      return SessionPhase::Chatting;
    }
    if self.pending_analysis().is_empty() {
      return SessionPhase::Analyzed;
    }
    SessionPhase::TranscriptsSelected
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn transcript(ticker: &str, year: i32, quarter: u8) -> Transcript {
    Transcript {
      ticker: ticker.to_string(), year, quarter,
      content: format!("{} {} Q{} call", ticker, year, quarter),
      date: format!("{}-0{}-20", year, quarter),
    }
  }

  fn loaded(state: &SessionState, ticker: &str, quarters: &[u8]) -> SessionState {
    let transcripts = quarters.iter().map(|&q| transcript(ticker, 2024, q)).collect();
    state.apply(SessionEvent::TickerLoaded { ticker: ticker.to_string(), transcripts })
  }

  fn turn(question: &str) -> ChatTurn {
    ChatTurn { question: question.to_string(), answer: "answer".to_string(), asked_at: Utc::now() }
  }

  #[test]
  fn apply_leaves_previous_state_untouched() {
    let empty = SessionState::new();
    let next = loaded(&empty, "ACME", &[1, 2]);

    assert!(empty.selected_tickers.is_empty());
    assert_eq!(empty.version, 0);
    assert_eq!(next.version, 1);
    assert_eq!(next.selected_tickers, vec!["ACME"]);
  }

  #[test]
  fn empty_or_duplicate_load_is_ignored() {
    let state = SessionState::new().apply(SessionEvent::TickerLoaded { ticker: "NOPE".to_string(), transcripts: Vec::new() });
    assert!(!state.has_ticker("NOPE"));
    assert_eq!(state.version, 0);

    let state = loaded(&state, "ACME", &[1]);
    let again = loaded(&state, "ACME", &[1, 2, 3]);
    assert_eq!(again.version, state.version);
    assert_eq!(again.transcripts_by_ticker["ACME"].len(), 1);
  }

  #[test]
  fn toggling_unknown_transcript_is_ignored() {
    let state = loaded(&SessionState::new(), "ACME", &[1]);
    let next = state.apply(SessionEvent::SelectionToggled(TranscriptKey::new("ACME", 2024, 4)));
    assert!(next.selected.is_empty());
    assert_eq!(next.version, state.version);
  }

  #[test]
  fn removing_ticker_drops_its_selections_and_company_filter() {
    let mut state = loaded(&SessionState::new(), "ACME", &[1, 2]);
    state = loaded(&state, "BOLT", &[1]);
    state = state.apply(SessionEvent::SelectionToggled(TranscriptKey::new("ACME", 2024, 1)));
    state = state.apply(SessionEvent::SelectionToggled(TranscriptKey::new("BOLT", 2024, 1)));
    state = state.apply(SessionEvent::FiltersChanged(FilterCriteria {
      companies: BTreeSet::from(["ACME".to_string(), "BOLT".to_string()]),
      ..FilterCriteria::default()
    }));

    state = state.apply(SessionEvent::TickerRemoved("ACME".to_string()));

    assert_eq!(state.selected_tickers, vec!["BOLT"]);
    assert!(state.selected.iter().all(|k| k.ticker != "ACME"));
    assert_eq!(state.selected.len(), 1);
    assert_eq!(state.filters.companies, BTreeSet::from(["BOLT".to_string()]));
  }

  #[test]
  fn removing_last_ticker_clears_chat_summary_and_cache() {
    let mut state = loaded(&SessionState::new(), "ACME", &[1]);
    state = loaded(&state, "BOLT", &[1]);
    let keys = vec![TranscriptKey::new("ACME", 2024, 1), TranscriptKey::new("BOLT", 2024, 1)];
    for key in &keys {
      state = state.apply(SessionEvent::SelectionToggled(key.clone()));
    }
    state = state.apply(SessionEvent::AnalysisCompleted { keys: keys.clone(), summary: "both".to_string() });
    state = state.apply(SessionEvent::ChatAnswered(turn("q")));

    state = state.apply(SessionEvent::TickerRemoved("ACME".to_string()));
    assert_eq!(state.chat_history.len(), 1);
    assert!(!state.running_summary.is_empty());

    state = state.apply(SessionEvent::TickerRemoved("BOLT".to_string()));
    assert!(state.chat_history.is_empty());
    assert!(state.running_summary.is_empty());
    assert!(state.analyzed.is_empty());
    assert_eq!(state.phase(), SessionPhase::Empty);
  }

  #[test]
  fn analysis_appends_to_running_summary_once() {
    let mut state = loaded(&SessionState::new(), "ACME", &[1, 2]);
    let q1 = TranscriptKey::new("ACME", 2024, 1);
    let q2 = TranscriptKey::new("ACME", 2024, 2);

    state = state.apply(SessionEvent::AnalysisCompleted { keys: vec![q1.clone()], summary: "first".to_string() });
    state = state.apply(SessionEvent::AnalysisCompleted { keys: vec![q2.clone()], summary: "second".to_string() });
    assert_eq!(state.running_summary, "first\n\nsecond");

    let version = state.version;
    state = state.apply(SessionEvent::AnalysisCompleted { keys: vec![q1], summary: "again".to_string() });
    assert_eq!(state.version, version);
    assert_eq!(state.running_summary, "first\n\nsecond");
  }

  #[test]
  fn phase_follows_the_flow() {
    let mut state = SessionState::new();
    assert_eq!(state.phase(), SessionPhase::Empty);

    state = loaded(&state, "ACME", &[1]);
    assert_eq!(state.phase(), SessionPhase::TranscriptsFetched);

    let key = TranscriptKey::new("ACME", 2024, 1);
    state = state.apply(SessionEvent::SelectionToggled(key.clone()));
    assert_eq!(state.phase(), SessionPhase::TranscriptsSelected);
    assert_eq!(state.pending_analysis().len(), 1);

    state = state.apply(SessionEvent::AnalysisCompleted { keys: vec![key], summary: "s".to_string() });
    assert_eq!(state.phase(), SessionPhase::Analyzed);
    assert!(state.pending_analysis().is_empty());

    state = state.apply(SessionEvent::ChatAnswered(turn("q")));
    assert_eq!(state.phase(), SessionPhase::Chatting);
  }

  #[test]
  fn unchanged_search_and_filters_do_not_bump_version() {
    let state = SessionState::new().apply(SessionEvent::SearchChanged("revenue".to_string()));
    assert_eq!(state.version, 1);
    let same = state.apply(SessionEvent::SearchChanged("revenue".to_string()));
    assert_eq!(same.version, 1);
    let same = same.apply(SessionEvent::FiltersChanged(FilterCriteria::default()));
    assert_eq!(same.version, 1);
  }
}
