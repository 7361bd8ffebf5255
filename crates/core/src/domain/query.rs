use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Historical window requested from the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[default]
    #[serde(rename = "60d")]
    Days60,
    #[serde(rename = "90d")]
    Days90,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [
        DateRange::Days7,
        DateRange::Days30,
        DateRange::Days60,
        DateRange::Days90,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::Days7 => "7d",
            DateRange::Days30 => "30d",
            DateRange::Days60 => "60d",
            DateRange::Days90 => "90d",
        }
    }

    pub fn days(self) -> u32 {
        match self {
            DateRange::Days7 => 7,
            DateRange::Days30 => 30,
            DateRange::Days60 => 60,
            DateRange::Days90 => 90,
        }
    }

    pub fn display_name(self) -> String {
        format!("Last {} Days", self.days())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(DateRange::Days7),
            "30d" => Ok(DateRange::Days30),
            "60d" => Ok(DateRange::Days60),
            "90d" => Ok(DateRange::Days90),
            other => bail!("unsupported date range {other:?} (expected 7d, 30d, 60d or 90d)"),
        }
    }
}

/// Symbol and window for one prediction request. Built on submit and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerQuery {
    symbol: String,
    date_range: DateRange,
}

impl TickerQuery {
    pub fn new(symbol: &str, date_range: DateRange) -> anyhow::Result<Self> {
        let symbol = normalize_symbol(symbol);
        ensure!(!symbol.is_empty(), "ticker symbol must be non-empty");
        Ok(Self { symbol, date_range })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }
}

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_parses_wire_names() {
        for range in DateRange::ALL {
            assert_eq!(range.as_str().parse::<DateRange>().unwrap(), range);
        }
        assert_eq!(" 90D ".parse::<DateRange>().unwrap(), DateRange::Days90);
        assert!("14d".parse::<DateRange>().is_err());
    }

    #[test]
    fn date_range_defaults_to_sixty_days() {
        assert_eq!(DateRange::default(), DateRange::Days60);
        assert_eq!(DateRange::Days30.display_name(), "Last 30 Days");
    }

    #[test]
    fn query_uppercases_and_rejects_blank_symbols() {
        let query = TickerQuery::new(" aapl ", DateRange::Days7).unwrap();
        assert_eq!(query.symbol(), "AAPL");
        assert_eq!(query.date_range(), DateRange::Days7);

        assert!(TickerQuery::new("   ", DateRange::Days7).is_err());
    }
}
