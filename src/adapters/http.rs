use crate::domain::ports::TokenProvider;
use crate::utils::error::{Result, SampleError};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// 兩個 REST client 共用的傳輸層：base URL、授權標頭與錯誤轉換
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiTransport {
    pub fn new(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, tokens))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 建立帶有 bearer token 的請求
    pub async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = Self::check(builder.send().await?).await?;
        let body = response.bytes().await?;
        // 空回應視為 `{}`
        if body.is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = SampleError::from_response(status.as_u16(), &body);
        tracing::debug!("Request failed: {}", error);
        Err(error)
    }
}

impl std::fmt::Debug for ApiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
