use std::sync::Arc;
use chrono::Utc;

use crate::ai_agent::data::models::ChatTurn;
use crate::ai_agent::error::SessionError;
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};
use crate::ai_agent::session::state::{SessionEvent, SessionState};


pub const QA_SYSTEM_PROMPT: &str = "Your job is to answer questions based only on the information disclosed in the selected earnings calls. \
For any information you provide, if there is a related data point, always disclose it in your answer. \
If the calls do not cover the question, say so instead of guessing.";

pub struct QaAgent {
  llm: Arc<dyn LLMChatter>,
  model_config: LLMModelConfig,
}

impl QaAgent {
  pub fn new(llm: Arc<dyn LLMChatter>, model_config: LLMModelConfig) -> Self {
    QaAgent { llm, model_config }
  }

  pub fn build_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
      ChatMessage::system(QA_SYSTEM_PROMPT),
      ChatMessage::system(context),
      ChatMessage::user(question),
    ]
  }

  pub async fn answer(&self, state: &SessionState, question: &str) -> Result<SessionEvent, SessionError> {
    let question: &str = question.trim();
    if question.is_empty() {
      return Err(SessionError::Validation("question must not be empty".to_string()));
    }

    log::info!("qa_agent answering question with {} chars of context", state.running_summary.len());
    let messages: Vec<ChatMessage> = Self::build_messages(&state.running_summary, question);

    let response: LLMResponse = self.llm
      .chat(messages, &self.model_config)
      .await
      .map_err(|e| {
        log::error!("qa_agent completion failed ({}): {}", e.kind(), e);
        SessionError::Completion(e)
      })?;

    return Ok(SessionEvent::ChatAnswered(ChatTurn {
      question: question.to_string(),
      answer: response.content,
      asked_at: Utc::now(),
    }));
  }
}
