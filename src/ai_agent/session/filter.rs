use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::ai_agent::data::models::{Transcript, TranscriptKey};

/// Narrowing criteria for the transcript list. An empty set does not restrict its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
  #[serde(default)]
  pub companies: BTreeSet<String>,
  #[serde(default)]
  pub years: BTreeSet<i32>,
  #[serde(default)]
  pub quarters: BTreeSet<u8>,
}

impl FilterCriteria {
  pub fn is_empty(&self) -> bool {
    self.companies.is_empty() && self.years.is_empty() && self.quarters.is_empty()
  }

  pub fn admits(&self, transcript: &Transcript) -> bool {
    (self.companies.is_empty() || self.companies.contains(&transcript.ticker))
      && (self.years.is_empty() || self.years.contains(&transcript.year))
      && (self.quarters.is_empty() || self.quarters.contains(&transcript.quarter))
  }
}

/// Values the filter panel can offer for the current search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
  pub companies: Vec<String>,
  pub years: Vec<i32>,
  pub quarters: Vec<u8>,
}

pub fn matches_search(transcript: &Transcript, search: &str) -> bool {
  let needle: &str = search.trim();
  if needle.is_empty() {
    return true;
  }
  transcript.content.to_lowercase().contains(&needle.to_lowercase())
}

pub fn search_transcripts<'a>(transcripts: &[&'a Transcript], search: &str) -> Vec<&'a Transcript> {
  transcripts.iter().copied().filter(|t| matches_search(t, search)).collect()
}

/// Search first, then each non-empty criteria set. Input order is preserved.
pub fn filter_transcripts<'a>(transcripts: &[&'a Transcript], search: &str, criteria: &FilterCriteria) -> Vec<&'a Transcript> {
  transcripts.iter()
    .copied()
    .filter(|t| matches_search(t, search))
    .filter(|t| criteria.admits(t))
    .collect()
}

pub fn filter_options(transcripts: &[&Transcript]) -> FilterOptions {
  let companies: BTreeSet<&str> = transcripts.iter().map(|t| t.ticker.as_str()).collect();
  let years: BTreeSet<i32> = transcripts.iter().map(|t| t.year).collect();
  let quarters: BTreeSet<u8> = transcripts.iter().map(|t| t.quarter).collect();

  FilterOptions {
    companies: companies.into_iter().map(String::from).collect(),
    years: years.into_iter().collect(),
    quarters: quarters.into_iter().collect(),
  }
}

/// Groups by ticker, tickers in order of first appearance.
pub fn group_by_ticker<'a>(transcripts: &[&'a Transcript]) -> Vec<(String, Vec<&'a Transcript>)> {
  let mut groups: Vec<(String, Vec<&'a Transcript>)> = Vec::new();

  for &transcript in transcripts {
    match groups.iter_mut().find(|(ticker, _)| *ticker == transcript.ticker) {
      Some((_, members)) => members.push(transcript),
      None => groups.push((transcript.ticker.clone(), vec![transcript])),
    }
  }

  return groups;
}

/// Removes `key` if selected, adds it otherwise.
pub fn toggle(selection: &mut BTreeSet<TranscriptKey>, key: TranscriptKey) -> bool {
  if selection.remove(&key) {
    return false;
  }
  selection.insert(key);
  return true;
}
