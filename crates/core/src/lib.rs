pub mod chart;
pub mod client;
pub mod controller;
pub mod domain;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    pub const DEFAULT_PREDICTION_BASE_URL: &str = "http://127.0.0.1:5000";
    pub const DEFAULT_PREDICTION_PATH: &str = "/predict";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_STORE_PATH: &str = ".stockcast/store.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub prediction_base_url: String,
        pub prediction_path: String,
        pub prediction_timeout: Duration,
        pub store_path: PathBuf,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                prediction_base_url: DEFAULT_PREDICTION_BASE_URL.to_string(),
                prediction_path: DEFAULT_PREDICTION_PATH.to_string(),
                prediction_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                store_path: PathBuf::from(DEFAULT_STORE_PATH),
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();

            let prediction_timeout = match non_blank_var("PREDICTION_TIMEOUT_SECS") {
                Some(s) => Duration::from_secs(
                    s.parse::<u64>()
                        .with_context(|| format!("PREDICTION_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                None => defaults.prediction_timeout,
            };

            Ok(Self {
                prediction_base_url: non_blank_var("PREDICTION_BASE_URL")
                    .unwrap_or(defaults.prediction_base_url),
                prediction_path: non_blank_var("PREDICTION_PATH")
                    .unwrap_or(defaults.prediction_path),
                prediction_timeout,
                store_path: non_blank_var("STOCKCAST_STORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.store_path),
                sentry_dsn: non_blank_var("SENTRY_DSN"),
            })
        }

        /// Full URL of the prediction endpoint.
        pub fn prediction_url(&self) -> String {
            let path = if self.prediction_path.starts_with('/') {
                self.prediction_path.clone()
            } else {
                format!("/{}", self.prediction_path)
            };

            format!("{}{}", self.prediction_base_url.trim_end_matches('/'), path)
        }
    }

    fn non_blank_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn prediction_url_joins_base_and_path() {
            let mut settings = Settings::default();
            assert_eq!(settings.prediction_url(), "http://127.0.0.1:5000/predict");

            settings.prediction_base_url = "http://localhost:8080/".to_string();
            settings.prediction_path = "v2/predict".to_string();
            assert_eq!(settings.prediction_url(), "http://localhost:8080/v2/predict");
        }
    }
}
