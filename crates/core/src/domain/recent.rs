use crate::domain::query::normalize_symbol;
use serde::Serialize;

pub const MAX_RECENT_SYMBOLS: usize = 5;

/// Most-recent-first list of unique symbols, capped at [`MAX_RECENT_SYMBOLS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentSymbols(Vec<String>);

impl RecentSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient decode of the persisted JSON array. Anything unreadable becomes an empty list.
    pub fn from_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let symbols = match serde_json::from_str::<Vec<String>>(raw) {
            Ok(symbols) => symbols,
            Err(err) => {
                tracing::warn!(error = %err, "stored recent symbols are corrupt; starting empty");
                return Self::default();
            }
        };

        // Replay oldest first so the stored head ends up at the front again.
        let mut out = Self::default();
        for symbol in symbols.iter().take(MAX_RECENT_SYMBOLS * 4).rev() {
            out.push(symbol);
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// Moves `symbol` to the front, dropping any older copy and anything past the cap.
    pub fn push(&mut self, symbol: &str) {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return;
        }

        self.0.retain(|s| *s != symbol);
        self.0.insert(0, symbol);
        self.0.truncate(MAX_RECENT_SYMBOLS);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(recent: &RecentSymbols) -> Vec<&str> {
        recent.iter().collect()
    }

    #[test]
    fn push_is_most_recent_first_and_capped() {
        let mut recent = RecentSymbols::new();
        for s in ["AAPL", "MSFT", "GOOG", "AMZN", "TSLA", "META"] {
            recent.push(s);
            assert!(recent.len() <= MAX_RECENT_SYMBOLS);
        }
        assert_eq!(list(&recent), vec!["META", "TSLA", "AMZN", "GOOG", "MSFT"]);
    }

    #[test]
    fn pushing_existing_symbol_moves_it_to_front() {
        let mut recent = RecentSymbols::new();
        for s in ["AAPL", "MSFT", "GOOG"] {
            recent.push(s);
        }
        recent.push("aapl");
        assert_eq!(list(&recent), vec!["AAPL", "GOOG", "MSFT"]);
    }

    #[test]
    fn blank_symbols_are_ignored() {
        let mut recent = RecentSymbols::new();
        recent.push("  ");
        assert!(recent.is_empty());
    }

    #[test]
    fn from_json_tolerates_missing_and_corrupt_data() {
        assert!(RecentSymbols::from_json(None).is_empty());
        assert!(RecentSymbols::from_json(Some("not json")).is_empty());
        assert!(RecentSymbols::from_json(Some("{\"a\":1}")).is_empty());
    }

    #[test]
    fn from_json_restores_order_and_repairs_duplicates() {
        let recent = RecentSymbols::from_json(Some(r#"["NVDA","AAPL","NVDA","KO","V","MA","PEP"]"#));
        assert_eq!(list(&recent), vec!["NVDA", "AAPL", "KO", "V", "MA"]);

        let back = RecentSymbols::from_json(Some(&recent.to_json()));
        assert_eq!(back, recent);
    }
}
