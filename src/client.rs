use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::Value;

use crate::error::{ApiErrorBody, BailianError, Result};

pub const BAILIAN_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";

// Synchronous image generation can take tens of seconds upstream.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The two upstream API surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TextToImage,
    Multimodal,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TextToImage => "/services/aigc/text2image/image-synthesis",
            Endpoint::Multimodal => "/services/aigc/multimodal-generation/generation",
        }
    }
}

/// Bearer-authenticated JSON client for the Bailian endpoints.
#[derive(Clone)]
pub struct BailianClient {
    http: reqwest::Client,
    base_url: String,
    auth: HeaderValue,
}

impl std::fmt::Debug for BailianClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BailianClient")
            .field("base_url", &self.base_url)
            .field("auth", &"<redacted>")
            .finish()
    }
}

impl BailianClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|err| BailianError::Config(format!("invalid api key: {err}")))?;
        auth.set_sensitive(true);

        Ok(Self {
            http,
            base_url: BAILIAN_BASE_URL.to_string(),
            auth,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// POST a payload to one of the two endpoints and return the parsed JSON
    /// response. Any non-2xx status becomes a structured `Api` error.
    pub async fn post(&self, endpoint: Endpoint, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path());
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BailianError::Api {
                status,
                body: ApiErrorBody::from_raw(&text),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
