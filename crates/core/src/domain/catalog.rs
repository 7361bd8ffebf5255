use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Icon key for the renderer; not interpreted here.
    pub icon: &'static str,
}

const fn entry(name: &'static str, symbol: &'static str, icon: &'static str) -> CatalogEntry {
    CatalogEntry { name, symbol, icon }
}

pub const POPULAR_STOCKS: &[CatalogEntry] = &[
    entry("Apple", "AAPL", "apple"),
    entry("Google", "GOOG", "google"),
    entry("Microsoft", "MSFT", "microsoft"),
    entry("Amazon", "AMZN", "amazon"),
    entry("Tesla", "TSLA", "car"),
    entry("Meta (Facebook)", "META", "facebook"),
    entry("NVIDIA", "NVDA", "nvidia"),
    entry("Netflix", "NFLX", "netflix"),
    entry("Adobe", "ADBE", "adobe"),
    entry("PayPal", "PYPL", "paypal"),
    entry("Intel", "INTC", "intel"),
    entry("Salesforce", "CRM", "salesforce"),
    entry("Visa", "V", "visa"),
    entry("Mastercard", "MA", "mastercard"),
    entry("Walmart", "WMT", "walmart"),
    entry("Coca-Cola", "KO", "cocacola"),
    entry("PepsiCo", "PEP", "pepsi"),
];

pub fn popular_stocks() -> &'static [CatalogEntry] {
    POPULAR_STOCKS
}

pub fn find_by_symbol(symbol: &str) -> Option<&'static CatalogEntry> {
    POPULAR_STOCKS
        .iter()
        .find(|e| e.symbol.eq_ignore_ascii_case(symbol.trim()))
}

/// Catalog entries whose symbol starts with `input` or whose name contains it, both
/// case-insensitively. Catalog order is preserved; empty input matches nothing.
pub fn suggestions(input: &str) -> Vec<CatalogEntry> {
    if input.is_empty() {
        return Vec::new();
    }

    let upper = input.to_uppercase();
    let lower = input.to_lowercase();
    POPULAR_STOCKS
        .iter()
        .filter(|e| e.symbol.starts_with(&upper) || e.name.to_lowercase().contains(&lower))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn symbols(entries: &[CatalogEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.symbol).collect()
    }

    #[test]
    fn empty_input_has_no_suggestions() {
        assert!(suggestions("").is_empty());
    }

    #[test]
    fn matches_symbol_prefix_and_name_substring() {
        assert_eq!(
            symbols(&suggestions("a")),
            vec!["AAPL", "AMZN", "TSLA", "META", "NVDA", "ADBE", "PYPL", "CRM", "V", "MA", "WMT", "KO"]
        );
        assert_eq!(symbols(&suggestions("ms")), vec!["MSFT"]);
        assert_eq!(symbols(&suggestions("cola")), vec!["KO"]);
        assert_eq!(symbols(&suggestions("FACE")), vec!["META"]);
        assert!(suggestions("zzz").is_empty());
    }

    #[test]
    fn every_suggestion_satisfies_the_filter() {
        for input in ["m", "Ne", "p", "INT", "o", "-"] {
            for e in suggestions(input) {
                assert!(
                    e.symbol.starts_with(&input.to_uppercase())
                        || e.name.to_lowercase().contains(&input.to_lowercase()),
                    "{} does not match {input}",
                    e.symbol
                );
            }
        }
    }

    #[test]
    fn icons_are_unique() {
        let icons: HashSet<_> = POPULAR_STOCKS.iter().map(|e| e.icon).collect();
        assert_eq!(icons.len(), POPULAR_STOCKS.len());
    }

    #[test]
    fn finds_entries_by_symbol() {
        assert_eq!(find_by_symbol("pep").map(|e| e.name), Some("PepsiCo"));
        assert!(find_by_symbol("IBM").is_none());
    }
}
