use crate::domain::prediction::{PredictionResult, Sentiment};
use crate::domain::query::{DateRange, TickerQuery};
use anyhow::{bail, ensure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symbol: String,
    pub date_range: DateRange,
}

impl From<&TickerQuery> for PredictionRequest {
    fn from(query: &TickerQuery) -> Self {
        Self {
            symbol: query.symbol().to_string(),
            date_range: query.date_range(),
        }
    }
}

/// Response body as sent by the service. Every field is optional on the wire; use
/// [`PredictionResponse::validate_and_into_result`] before trusting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub historical_price: Option<Vec<HistoricalEntry>>,
    #[serde(default)]
    pub predicted_price: Option<Vec<f64>>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A historical close, either bare (`101.5`) or wrapped with auxiliary fields
/// (`[101.5, "2024-01-02", ...]`). Only the leading price is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoricalEntry {
    Price(f64),
    Tuple(Vec<Value>),
}

impl HistoricalEntry {
    pub fn price(&self) -> Option<f64> {
        match self {
            HistoricalEntry::Price(p) => Some(*p),
            HistoricalEntry::Tuple(values) => values.first().and_then(Value::as_f64),
        }
    }
}

impl PredictionResponse {
    pub fn validate_and_into_result(
        self,
        query: &TickerQuery,
        received_at: DateTime<Utc>,
    ) -> anyhow::Result<PredictionResult> {
        if let Some(error) = self.error.as_deref() {
            bail!("service reported error: {error}");
        }

        let Some(historical) = self.historical_price else {
            bail!("response is missing historical_price");
        };
        let Some(predicted) = self.predicted_price else {
            bail!("response is missing predicted_price");
        };
        ensure!(!historical.is_empty(), "historical_price must be non-empty");
        ensure!(!predicted.is_empty(), "predicted_price must be non-empty");

        let mut historical_prices = Vec::with_capacity(historical.len());
        for (idx, entry) in historical.iter().enumerate() {
            let Some(price) = entry.price() else {
                bail!("historical_price[{idx}] has no leading numeric price");
            };
            ensure!(price.is_finite(), "historical_price[{idx}] is not finite");
            historical_prices.push(price);
        }

        for (idx, price) in predicted.iter().enumerate() {
            ensure!(price.is_finite(), "predicted_price[{idx}] is not finite");
        }

        Ok(PredictionResult {
            symbol: query.symbol().to_string(),
            historical_prices,
            predicted_prices: predicted,
            sentiment: Sentiment::new(self.sentiment.unwrap_or_default()),
            received_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> TickerQuery {
        TickerQuery::new("MSFT", DateRange::Days90).unwrap()
    }

    #[test]
    fn request_serializes_date_range_verbatim() {
        let body = serde_json::to_value(PredictionRequest::from(&query())).unwrap();
        assert_eq!(body, json!({"symbol": "MSFT", "date_range": "90d"}));
    }

    #[test]
    fn accepts_tupled_and_bare_historical_entries() {
        let v = json!({
            "historical_price": [[100.0], 101.0, [102.0, 9.0]],
            "predicted_price": [103.0, 104.0],
            "sentiment": "🟢 Bullish Trend (Expected growth)"
        });

        let parsed: PredictionResponse = serde_json::from_value(v).unwrap();
        let result = parsed.validate_and_into_result(&query(), Utc::now()).unwrap();
        assert_eq!(result.symbol(), "MSFT");
        assert_eq!(result.historical_prices(), &[100.0, 101.0, 102.0]);
        assert_eq!(result.predicted_prices(), &[103.0, 104.0]);
        assert_eq!(result.sentiment().label(), "🟢 Bullish Trend (Expected growth)");

        let dated = json!({
            "historical_price": [[100.0, "2024-01-02"], [101.0, "2024-01-03", 12000]],
            "predicted_price": [103.0]
        });
        let parsed: PredictionResponse = serde_json::from_value(dated).unwrap();
        let result = parsed.validate_and_into_result(&query(), Utc::now()).unwrap();
        assert_eq!(result.historical_prices(), &[100.0, 101.0]);
    }

    #[test]
    fn missing_sentiment_defaults_to_empty() {
        let v = json!({"historical_price": [1.0], "predicted_price": [2.0]});
        let parsed: PredictionResponse = serde_json::from_value(v).unwrap();
        let result = parsed.validate_and_into_result(&query(), Utc::now()).unwrap();
        assert!(result.sentiment().is_empty());
    }

    #[test]
    fn rejects_missing_or_empty_series() {
        let cases = [
            json!({"historical_price": [[100.0]]}),
            json!({"predicted_price": [103.0]}),
            json!({"historical_price": [], "predicted_price": [103.0]}),
            json!({"historical_price": [[100.0]], "predicted_price": []}),
            json!({"historical_price": [[]], "predicted_price": [103.0]}),
            json!({"historical_price": [["2024-01-02", 100.0]], "predicted_price": [103.0]}),
            json!({"error": "No data found for ticker."}),
        ];

        for v in cases {
            let parsed: PredictionResponse = serde_json::from_value(v.clone()).unwrap();
            assert!(
                parsed.validate_and_into_result(&query(), Utc::now()).is_err(),
                "expected rejection for {v}"
            );
        }
    }
}
