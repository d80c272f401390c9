use std::sync::Arc;

use crate::ai_agent::data::models::{Transcript, TranscriptKey};
use crate::ai_agent::error::SessionError;
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};
use crate::ai_agent::session::state::{SessionEvent, SessionState};


pub const ANALYST_SYSTEM_PROMPT: &str = r#"You are a senior equity research analyst. You will receive one or more earnings call transcripts.
Each transcript starts with a header line of the form "=== TICKER FYYEAR QN (DATE) ===".

Produce a structured financial summary covering every period provided:
  - For each company, list the periods in chronological order.
  - For each period report: revenue, revenue growth, gross and operating margin, EPS, cash flow, and any guidance given.
    Quote the exact figures stated on the call and mark anything not disclosed as "not disclosed".
  - Compare periods: call out trends, accelerations or reversals across quarters and years.
  - Summarize management commentary on demand, costs, capital allocation and risks.
  - Finish with the key takeaways an investor should follow up on.

Only use facts stated in the transcripts. Do not estimate or invent numbers."#;

pub struct TranscriptAnalyst {
  llm: Arc<dyn LLMChatter>,
  model_config: LLMModelConfig,
}

impl TranscriptAnalyst {
  pub fn new(llm: Arc<dyn LLMChatter>, model_config: LLMModelConfig) -> Self {
    TranscriptAnalyst { llm, model_config }
  }

  /// Joins transcripts into one prompt body, each preceded by its label header.
  pub fn build_batch(transcripts: &[&Transcript]) -> String {
    transcripts.iter()
      .map(|t| format!("=== {} ===\n{}", t.label(), t.content.trim()))
      .collect::<Vec<String>>()
      .join("\n\n")
  }

  pub fn build_messages(batch: &str) -> Vec<ChatMessage> {
    vec![
      ChatMessage::system(ANALYST_SYSTEM_PROMPT),
      ChatMessage::user(batch),
    ]
  }

  /// Sends every selected, not yet analyzed transcript in a single request.
  /// Returns `None` when nothing is pending. On error nothing is recorded.
  pub async fn analyze(&self, state: &SessionState) -> Result<Option<SessionEvent>, SessionError> {
    let pending: Vec<&Transcript> = state.pending_analysis();
    if pending.is_empty() {
      log::debug!("transcript_analyst nothing new to analyze");
      return Ok(None);
    }

    let keys: Vec<TranscriptKey> = pending.iter().map(|t| t.key()).collect();
    let batch: String = Self::build_batch(&pending);
    log::info!("transcript_analyst analyzing {} transcripts ({} chars)", keys.len(), batch.len());

    let response: LLMResponse = self.llm
      .chat(Self::build_messages(&batch), &self.model_config)
      .await
      .map_err(|e| {
        log::error!("transcript_analyst completion failed ({}): {}", e.kind(), e);
        SessionError::Completion(e)
      })?;

    log::debug!("transcript_analyst summary: {}", response.content);
    return Ok(Some(SessionEvent::AnalysisCompleted { keys, summary: response.content }));
  }
}
