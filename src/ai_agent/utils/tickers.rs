use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerEntry {
  pub ticker: &'static str,
  pub company: &'static str,
}

impl TickerEntry {
  /// Text shown in the picker, e.g. `AAPL - Apple Inc.`
  pub fn display_name(&self) -> String {
    format!("{} - {}", self.ticker, self.company)
  }
}

const fn entry(ticker: &'static str, company: &'static str) -> TickerEntry {
  TickerEntry { ticker, company }
}

// Reference list for the picker only; any symbol can still be fetched.
static TICKER_DIRECTORY: Lazy<Vec<TickerEntry>> = Lazy::new(|| {
  let mut entries: Vec<TickerEntry> = vec![
    entry("AAPL", "Apple Inc."),
    entry("MSFT", "Microsoft Corporation"),
    entry("GOOGL", "Alphabet Inc."),
    entry("AMZN", "Amazon.com, Inc."),
    entry("META", "Meta Platforms, Inc."),
    entry("NVDA", "NVIDIA Corporation"),
    entry("TSLA", "Tesla, Inc."),
    entry("AMD", "Advanced Micro Devices, Inc."),
    entry("INTC", "Intel Corporation"),
    entry("NFLX", "Netflix, Inc."),
    entry("CRM", "Salesforce, Inc."),
    entry("ORCL", "Oracle Corporation"),
    entry("ADBE", "Adobe Inc."),
    entry("JPM", "JPMorgan Chase & Co."),
    entry("BAC", "Bank of America Corporation"),
    entry("GS", "The Goldman Sachs Group, Inc."),
    entry("V", "Visa Inc."),
    entry("MA", "Mastercard Incorporated"),
    entry("WMT", "Walmart Inc."),
    entry("COST", "Costco Wholesale Corporation"),
    entry("KO", "The Coca-Cola Company"),
    entry("PEP", "PepsiCo, Inc."),
    entry("DIS", "The Walt Disney Company"),
    entry("JNJ", "Johnson & Johnson"),
    entry("PFE", "Pfizer Inc."),
    entry("UNH", "UnitedHealth Group Incorporated"),
    entry("XOM", "Exxon Mobil Corporation"),
    entry("CVX", "Chevron Corporation"),
    entry("BA", "The Boeing Company"),
    entry("NKE", "NIKE, Inc."),
  ];
  entries.sort_by(|a, b| a.ticker.cmp(b.ticker));
  entries
});

pub fn get_ticker_directory() -> &'static [TickerEntry] {
  TICKER_DIRECTORY.as_slice()
}

pub fn company_name(ticker: &str) -> Option<&'static str> {
  get_ticker_directory().iter().find(|e| e.ticker.eq_ignore_ascii_case(ticker)).map(|e| e.company)
}

/// Symbol-prefix matches first, then company-name substring matches. Empty query lists everything.
pub fn search_tickers(query: &str, limit: usize) -> Vec<&'static TickerEntry> {
  let needle: String = query.trim().to_lowercase();
  if needle.is_empty() {
    return get_ticker_directory().iter().take(limit).collect();
  }

  let (mut by_symbol, by_name): (Vec<&TickerEntry>, Vec<&TickerEntry>) = get_ticker_directory()
    .iter()
    .filter(|e| e.ticker.to_lowercase().starts_with(&needle) || e.company.to_lowercase().contains(&needle))
    .partition(|e| e.ticker.to_lowercase().starts_with(&needle));

  by_symbol.extend(by_name);
  by_symbol.truncate(limit);
  return by_symbol;
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn symbol_prefix_ranks_before_name_match() {
    // "ma" prefixes MA and matches "Walmart", "Mastercard", "Amazon".
    let hits: Vec<&str> = search_tickers("ma", 10).iter().map(|e| e.ticker).collect();
    assert_eq!(hits[0], "MA");
    assert!(hits.contains(&"WMT"));
  }

  #[test]
  fn lookup_is_case_insensitive() {
    assert_eq!(company_name("aapl"), Some("Apple Inc."));
    assert_eq!(company_name("ZZZZ"), None);
  }

  #[test]
  fn limit_is_respected() {
    assert_eq!(search_tickers("", 5).len(), 5);
    assert!(search_tickers("inc", 3).len() <= 3);
  }

  #[test]
  fn display_name_joins_symbol_and_company() {
    assert_eq!(entry("KO", "The Coca-Cola Company").display_name(), "KO - The Coca-Cola Company");
  }
}
