use serde::{Serialize, Deserialize};
use std::sync::{Arc, OnceLock};


use crate::ai_agent::llm::model_provider::{LLMModelConfig, ModelProvider, LLMChatter};
use crate::ai_agent::llm::openai::OpenAICompatibleProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModel {
  pub display_name: String,
  pub model_name: String, // The actual name used in API calls
  pub provider: ModelProvider,
}

impl LLMModel {
  pub fn new(display_name: &str, model_name: &str, provider: ModelProvider) -> Self {
    LLMModel {
      display_name: display_name.to_string(),
      model_name: model_name.to_string(),
      provider,
    }
  }
}

fn available_models_data() -> Vec<LLMModel> {
  vec![
    LLMModel::new("[openai] gpt-4o", "gpt-4o", ModelProvider::OpenAI),
    LLMModel::new("[openai] gpt-4o-mini", "gpt-4o-mini", ModelProvider::OpenAI),
    LLMModel::new("[openai] gpt-4-turbo", "gpt-4-turbo", ModelProvider::OpenAI),

    // Long transcripts need the large context variants.
    LLMModel::new("[groq] llama-3.3-70b", "llama-3.3-70b-versatile", ModelProvider::Groq),
    LLMModel::new("[groq] llama-3.1-8b", "llama-3.1-8b-instant", ModelProvider::Groq),
  ]
}

pub static AVAILABLE_MODELS: OnceLock<Vec<LLMModel>> = OnceLock::new();


pub fn get_available_models() -> &'static [LLMModel] {
  AVAILABLE_MODELS.get_or_init(available_models_data).as_slice()
}

pub fn get_model_info(model_name: &str) -> Option<&'static LLMModel> {
  get_available_models()
      .iter()
      .find(|&model_desc| model_desc.model_name == model_name)
}

pub fn get_model(config: &LLMModelConfig) -> Arc<dyn LLMChatter> {
  log::info!("Initializing LLM client for provider: {}, model: {}", config.provider, config.model_name);

  match get_model_info(&config.model_name) {
    Some(info) if info.provider != config.provider => {
      log::warn!("Model {} is listed under {}, but requests go to {}", config.model_name, info.provider, config.provider);
    }
    None => log::warn!("Model {} is not in the known model list, sending it as-is", config.model_name),
    _ => {}
  }

  // Both providers speak the same chat-completions protocol; only the URL differs.
  match config.provider {
    ModelProvider::Groq | ModelProvider::OpenAI => Arc::new(OpenAICompatibleProvider::new()),
  }
}
