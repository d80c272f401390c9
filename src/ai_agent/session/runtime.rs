use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::ai_agent::agents::qa_agent::QaAgent;
use crate::ai_agent::agents::transcript_analyst::TranscriptAnalyst;
use crate::ai_agent::data::models::{Transcript, TranscriptKey};
use crate::ai_agent::error::SessionError;
use crate::ai_agent::session::filter::FilterCriteria;
use crate::ai_agent::session::state::{SessionEvent, SessionState};
use crate::ai_agent::tools::api::{fetch_transcripts_for_ticker, TranscriptSource};

const QUEUE_DEPTH: usize = 32;

/// A discrete request from the user, processed one at a time.
#[derive(Debug, Clone)]
pub enum UserAction {
  AddTicker(String),
  RemoveTicker(String),
  ToggleTranscript(TranscriptKey),
  SetSearch(String),
  SetFilters(FilterCriteria),
  Analyze,
  Ask(String),
  Snapshot,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
  pub state: SessionState,
  pub notice: Option<String>,
}

struct Envelope {
  action: UserAction,
  reply: oneshot::Sender<Result<ActionOutcome, SessionError>>,
}

/// Cloneable entry point to a running session.
#[derive(Clone)]
pub struct SessionHandle {
  sender: mpsc::Sender<Envelope>,
}

impl SessionHandle {
  pub async fn dispatch(&self, action: UserAction) -> Result<ActionOutcome, SessionError> {
    let (reply, response) = oneshot::channel();
    self.sender.send(Envelope { action, reply }).await.map_err(|_| SessionError::RuntimeUnavailable)?;
    response.await.map_err(|_| SessionError::RuntimeUnavailable)?
  }
}

pub fn normalize_ticker(raw: &str) -> Result<String, SessionError> {
  let ticker: String = raw.trim().to_uppercase();
  if ticker.is_empty() {
    return Err(SessionError::Validation("ticker must not be empty".to_string()));
  }
  return Ok(ticker);
}

pub struct SessionRuntime {
  state: SessionState,
  source: Arc<dyn TranscriptSource>,
  analyst: TranscriptAnalyst,
  qa: QaAgent,
  years: Vec<i32>,
}

impl SessionRuntime {
  pub fn new(source: Arc<dyn TranscriptSource>, analyst: TranscriptAnalyst, qa: QaAgent, years: Vec<i32>) -> Self {
    SessionRuntime { state: SessionState::new(), source, analyst, qa, years }
  }

  /// Moves the runtime onto its own task and returns the handle feeding its queue.
  pub fn spawn(self) -> SessionHandle {
    let (sender, receiver) = mpsc::channel::<Envelope>(QUEUE_DEPTH);
    tokio::spawn(self.run(receiver));
    SessionHandle { sender }
  }

  async fn run(mut self, mut receiver: mpsc::Receiver<Envelope>) {
    log::info!("Session runtime started");
    while let Some(envelope) = receiver.recv().await {
      let result = self.handle(envelope.action).await;
      if envelope.reply.send(result).is_err() {
        log::warn!("Caller went away before the session replied");
      }
    }
    log::info!("Session runtime stopped at version {}", self.state().version);
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  fn commit(&mut self, event: SessionEvent) {
    self.state = self.state.apply(event);
    log::debug!("Session now at version {} ({:?})", self.state.version, self.state.phase());
  }

  fn outcome(&self, notice: Option<String>) -> ActionOutcome {
    ActionOutcome { state: self.state.clone(), notice }
  }

  pub async fn handle(&mut self, action: UserAction) -> Result<ActionOutcome, SessionError> {
    match action {
      UserAction::AddTicker(raw) => {
        let ticker: String = normalize_ticker(&raw)?;
        if self.state.has_ticker(&ticker) {
          return Ok(self.outcome(Some(format!("{} is already selected.", ticker))));
        }

        log::info!("Fetching transcripts for {}", ticker);
        let transcripts: Vec<Transcript> = fetch_transcripts_for_ticker(self.source.as_ref(), &ticker, &self.years).await;
        if transcripts.is_empty() {
          log::warn!("No transcripts found for {}", ticker);
          return Ok(self.outcome(Some(format!("No transcripts found for {}.", ticker))));
        }

        self.commit(SessionEvent::TickerLoaded { ticker, transcripts });
        Ok(self.outcome(None))
      }
      UserAction::RemoveTicker(raw) => {
        let ticker: String = normalize_ticker(&raw)?;
        if !self.state.has_ticker(&ticker) {
          return Err(SessionError::TickerNotSelected(ticker));
        }
        self.commit(SessionEvent::TickerRemoved(ticker));
        Ok(self.outcome(None))
      }
      UserAction::ToggleTranscript(key) => {
        if self.state.find(&key).is_none() {
          return Err(SessionError::UnknownTranscript(key));
        }
        self.commit(SessionEvent::SelectionToggled(key));
        Ok(self.outcome(None))
      }
      UserAction::SetSearch(query) => {
        self.commit(SessionEvent::SearchChanged(query));
        Ok(self.outcome(None))
      }
      UserAction::SetFilters(criteria) => {
        self.commit(SessionEvent::FiltersChanged(criteria));
        Ok(self.outcome(None))
      }
      UserAction::Analyze => {
        if self.state.selected.is_empty() {
          return Err(SessionError::NothingSelected);
        }
        let analysis: Option<SessionEvent> = self.analyst.analyze(&self.state).await?;
        let notice: Option<String> = match analysis {
          Some(event) => {
            self.commit(event);
            log::info!("{} transcripts analyzed so far", self.state.analyzed.len());
            None
          }
          None => Some("All selected transcripts are already analyzed.".to_string()),
        };
        Ok(self.outcome(notice))
      }
      UserAction::Ask(question) => {
        if question.trim().is_empty() {
          return Err(SessionError::Validation("question must not be empty".to_string()));
        }
        if self.state.selected.is_empty() {
          return Err(SessionError::NothingSelected);
        }
        // Newly selected transcripts are folded into the context before answering.
        // Nothing is committed until the answer arrives.
        let analysis: Option<SessionEvent> = self.analyst.analyze(&self.state).await?;
        let staged: SessionState = match &analysis {
          Some(event) => self.state.apply(event.clone()),
          None => self.state.clone(),
        };
        let answer: SessionEvent = self.qa.answer(&staged, &question).await?;
        if let Some(event) = analysis {
          self.commit(event);
        }
        self.commit(answer);
        Ok(self.outcome(None))
      }
      UserAction::Snapshot => Ok(self.outcome(None)),
    }
  }
}
