use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::waitlist::{
    dto::{CountResponse, SignupRequest, SignupResponse},
    trade::TradeType,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is empty unless the body carried one.
    #[error("server responded {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

/// The waitlist operations as seen from a caller.
#[async_trait]
pub trait WaitlistApi: Send + Sync {
    async fn signup(&self, email: &str, trade_type: TradeType) -> Result<SignupResponse, ClientError>;
    async fn count(&self) -> Result<i64, ClientError>;
}

#[derive(Clone)]
pub struct HttpWaitlistClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpWaitlistClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_default();
        Err(ClientError::Rejected { status, message })
    }
}

#[async_trait]
impl WaitlistApi for HttpWaitlistClient {
    async fn signup(&self, email: &str, trade_type: TradeType) -> Result<SignupResponse, ClientError> {
        let body = SignupRequest {
            email: email.to_string(),
            trade_type: trade_type.as_str().to_string(),
        };
        let res = self
            .http
            .post(self.url("/waitlist/signup"))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(res).await?.json::<SignupResponse>().await?)
    }

    async fn count(&self) -> Result<i64, ClientError> {
        let res = self.http.get(self.url("/waitlist/count")).send().await?;
        let body = Self::check(res).await?.json::<CountResponse>().await?;
        Ok(body.count)
    }
}
