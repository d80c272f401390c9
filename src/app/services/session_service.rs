use std::sync::Arc;

use crate::ai_agent::agents::qa_agent::QaAgent;
use crate::ai_agent::agents::transcript_analyst::TranscriptAnalyst;
use crate::ai_agent::data::models::TranscriptKey;
use crate::ai_agent::error::SessionError;
use crate::ai_agent::llm::model_provider::{LLMChatter, LLMModelConfig};
use crate::ai_agent::llm::models::get_model;
use crate::ai_agent::session::filter::FilterCriteria;
use crate::ai_agent::session::runtime::{ActionOutcome, SessionHandle, SessionRuntime, UserAction};
use crate::ai_agent::tools::api::{TranscriptAPI, TranscriptSource};
use crate::app::config::Config;

/// Thin async facade turning service calls into queued session actions.
#[derive(Clone)]
pub struct SessionService {
  handle: SessionHandle,
}

impl SessionService {
  /// Builds the real clients from `config` and starts the session runtime.
  pub fn new(config: &Config) -> Self {
    let model_config: LLMModelConfig = config.model_config();
    let llm: Arc<dyn LLMChatter> = get_model(&model_config);
    let source: Arc<dyn TranscriptSource> = Arc::new(TranscriptAPI::new(config));
    Self::with_clients(source, llm, model_config, config.transcript_years.clone())
  }

  pub fn with_clients(source: Arc<dyn TranscriptSource>, llm: Arc<dyn LLMChatter>, model_config: LLMModelConfig, years: Vec<i32>) -> Self {
    let runtime: SessionRuntime = SessionRuntime::new(
      source,
      TranscriptAnalyst::new(llm.clone(), model_config.clone()),
      QaAgent::new(llm, model_config),
      years,
    );
    SessionService { handle: runtime.spawn() }
  }

  pub async fn snapshot(&self) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::Snapshot).await
  }

  pub async fn add_ticker(&self, ticker: String) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::AddTicker(ticker)).await
  }

  pub async fn remove_ticker(&self, ticker: String) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::RemoveTicker(ticker)).await
  }

  pub async fn toggle_transcript(&self, key: TranscriptKey) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::ToggleTranscript(key)).await
  }

  pub async fn set_search(&self, query: String) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::SetSearch(query)).await
  }

  pub async fn set_filters(&self, criteria: FilterCriteria) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::SetFilters(criteria)).await
  }

  pub async fn analyze(&self) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::Analyze).await
  }

  pub async fn ask(&self, question: String) -> Result<ActionOutcome, SessionError> {
    self.handle.dispatch(UserAction::Ask(question)).await
  }
}
