use crate::client::error::FetchError;
use crate::client::PredictionClient;
use crate::config::Settings;
use crate::domain::contract::{PredictionRequest, PredictionResponse};
use anyhow::Context;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    url: String,
}

impl HttpPredictionClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.prediction_url(), settings.prediction_timeout)
    }

    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build prediction http client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl PredictionClient for HttpPredictionClient {
    fn service_name(&self) -> &'static str {
        "http_json"
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, FetchError> {
        tracing::debug!(
            url = %self.url,
            symbol = %request.symbol,
            date_range = %request.date_range,
            "posting prediction request"
        );

        let res = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|err| FetchError::transport("send", format!("{err:#}")))?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            FetchError::transport("read_body", format!("{err:#}")).with_status(status.as_u16())
        })?;

        if !status.is_success() {
            // The service reports lookup failures as {"error": "..."} with a 400.
            let detail = serde_json::from_str::<PredictionResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(FetchError::transport("http", detail)
                .with_status(status.as_u16())
                .with_raw_body(text));
        }

        tracing::debug!(http_status = %status, bytes = text.len(), "prediction response received");

        serde_json::from_str::<PredictionResponse>(&text).map_err(|err| {
            FetchError::validation("decode", format!("response is not a prediction body: {err}"))
                .with_status(status.as_u16())
                .with_raw_body(text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::DateRange;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    async fn ok_predict(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        seen.lock().unwrap().push(body);
        Json(json!({
            "historical_price": [[100.0], [101.0], [102.0]],
            "predicted_price": [103.0, 104.0],
            "sentiment": "🟢 Bullish Trend (Expected growth)"
        }))
    }

    async fn unknown_ticker() -> impl IntoResponse {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No data found for ticker."})),
        )
    }

    async fn not_json() -> &'static str {
        "<html>maintenance</html>"
    }

    fn client(base: &str, path: &str) -> HttpPredictionClient {
        HttpPredictionClient::new(format!("{base}{path}"), Duration::from_secs(5)).unwrap()
    }

    fn request(symbol: &str, date_range: DateRange) -> PredictionRequest {
        PredictionRequest {
            symbol: symbol.to_string(),
            date_range,
        }
    }

    #[tokio::test]
    async fn posts_symbol_and_date_range_verbatim() {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/predict", post(ok_predict))
            .with_state(seen.clone());
        let base = spawn_stub(app).await;

        let res = client(&base, "/predict")
            .predict(&request("NVDA", DateRange::Days90))
            .await
            .unwrap();

        assert_eq!(res.predicted_price, Some(vec![103.0, 104.0]));
        assert_eq!(res.historical_price.map(|h| h.len()), Some(3));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[json!({"symbol": "NVDA", "date_range": "90d"})]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let app = Router::new().route("/predict", post(unknown_ticker));
        let base = spawn_stub(app).await;

        let err = client(&base, "/predict")
            .predict(&request("ZZZZ", DateRange::Days60))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.status, Some(400));
        assert_eq!(err.detail, "No data found for ticker.");
        assert!(err.raw_body.unwrap().contains("No data found"));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_validation_error() {
        let app = Router::new().route("/predict", post(not_json));
        let base = spawn_stub(app).await;

        let err = client(&base, "/predict")
            .predict(&request("AAPL", DateRange::Days7))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.status, Some(200));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"), "/predict")
            .predict(&request("AAPL", DateRange::Days7))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.stage, "send");
        assert_eq!(err.status, None);
    }
}
