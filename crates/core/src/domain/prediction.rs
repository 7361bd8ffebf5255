use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated prediction for one symbol. Both price series are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub(crate) symbol: String,
    pub(crate) historical_prices: Vec<f64>,
    pub(crate) predicted_prices: Vec<f64>,
    pub(crate) sentiment: Sentiment,
    pub(crate) received_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn historical_prices(&self) -> &[f64] {
        &self.historical_prices
    }

    pub fn predicted_prices(&self) -> &[f64] {
        &self.predicted_prices
    }

    pub fn sentiment(&self) -> &Sentiment {
        &self.sentiment
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// One card per predicted price, labelled from `Day 1`.
    pub fn forecast_cards(&self) -> Vec<ForecastCard> {
        self.predicted_prices
            .iter()
            .enumerate()
            .map(|(idx, price)| ForecastCard {
                label: format!("Day {}", idx + 1),
                price: format_usd(*price),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub label: String,
    pub price: String,
}

/// Free-form sentiment label returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sentiment(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn trend(&self) -> Trend {
        if self.0.contains("Bullish") {
            Trend::Bullish
        } else if self.0.contains("Bearish") {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

/// Dollar amount with two decimals, e.g. `$103.00`.
pub fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}
