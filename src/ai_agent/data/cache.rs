use std::collections::BTreeMap;

use crate::ai_agent::data::models::TranscriptKey;

/// Summaries produced by the analyst, keyed by the transcript they cover.
/// A key is written once; later writes for the same key are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisCache {
  summaries: BTreeMap<TranscriptKey, String>,
}

impl AnalysisCache {
  pub fn contains(&self, key: &TranscriptKey) -> bool {
    self.summaries.contains_key(key)
  }

  pub fn get(&self, key: &TranscriptKey) -> Option<&str> {
    self.summaries.get(key).map(String::as_str)
  }

  /// Records `summary` against every key not analyzed yet. Returns how many keys were new.
  pub fn record(&mut self, keys: &[TranscriptKey], summary: &str) -> usize {
    let mut written: usize = 0;
    for key in keys {
      if self.summaries.contains_key(key) {
        log::debug!("Analysis for {} already cached, keeping first summary", key);
        continue;
      }
      self.summaries.insert(key.clone(), summary.to_string());
      written += 1;
    }
    return written;
  }

  pub fn len(&self) -> usize {
    self.summaries.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.summaries.is_empty()
  }

  pub fn clear(&mut self) {
    self.summaries.clear();
  }
}
