use serde::Deserialize;
use thiserror::Error;

/// Structured error body returned by the DashScope API on non-2xx responses.
///
/// The upstream contract is `{"code": ..., "message": ..., "request_id": ...}`,
/// but error bodies are not guaranteed to be JSON at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ApiErrorBody {
    /// Parse an upstream error body, falling back to the raw text when it is
    /// not the structured `{code, message, request_id}` shape.
    pub fn from_raw(raw: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(raw) {
            if parsed.code.is_some() || parsed.message.is_some() {
                return parsed;
            }
        }
        ApiErrorBody {
            code: None,
            message: Some(raw.to_string()),
            request_id: None,
        }
    }
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code.as_deref(), self.message.as_deref()) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}")?,
            (Some(code), None) => write!(f, "{code}")?,
            (None, Some(message)) => write!(f, "{message}")?,
            (None, None) => write!(f, "unknown error")?,
        }
        if let Some(request_id) = self.request_id.as_deref() {
            write!(f, " (request_id: {request_id})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum BailianError {
    #[error("DASHSCOPE_API_KEY is not set in environment")]
    MissingApiKey,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("bailian api error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: ApiErrorBody,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BailianError>;
