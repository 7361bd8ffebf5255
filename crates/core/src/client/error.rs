use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete with a 2xx response.
    Transport,
    /// The response completed but its body is unusable.
    Validation,
}

/// Diagnostics for a failed prediction round trip. Meant for logs only; the UI shows
/// [`crate::controller::FETCH_FAILED_MESSAGE`] regardless of the cause.
#[derive(Debug, Clone)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub stage: &'static str,
    pub detail: String,
    pub status: Option<u16>,
    pub raw_body: Option<String>,
}

impl FetchError {
    pub fn transport(stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            stage,
            detail: detail.into(),
            status: None,
            raw_body: None,
        }
    }

    pub fn validation(stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Validation,
            stage,
            detail: detail.into(),
            status: None,
            raw_body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FetchErrorKind::Transport
    }

    pub fn is_validation(&self) -> bool {
        self.kind == FetchErrorKind::Validation
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Validation => "validation",
        };
        write!(f, "prediction {kind} error (stage={}", self.stage)?;
        if let Some(status) = self.status {
            write!(f, ", status={status}")?;
        }
        write!(f, "): {}", self.detail)
    }
}

impl std::error::Error for FetchError {}
