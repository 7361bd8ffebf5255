pub mod error;
pub mod http;

use crate::domain::contract::{PredictionRequest, PredictionResponse};
use crate::client::error::FetchError;

pub use http::HttpPredictionClient;

/// The external prediction service. One call per submission, never retried.
#[async_trait::async_trait]
pub trait PredictionClient: Send + Sync {
    fn service_name(&self) -> &'static str;

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, FetchError>;
}
