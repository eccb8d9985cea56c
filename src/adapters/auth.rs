use crate::domain::ports::{ConfigProvider, TokenProvider};
use crate::utils::error::{Result, SampleError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
/// token 到期前多久視為失效並重新取得
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// 固定的 bearer token（例如 `gcloud auth print-access-token` 的輸出）
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(SampleError::AuthError {
                message: "access token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// 向 compute metadata server 取得預設服務帳號的 token，並快取到接近到期
pub struct MetadataTokenProvider {
    client: Client,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenProvider {
    pub fn new() -> Self {
        let host =
            std::env::var("GCE_METADATA_HOST").unwrap_or_else(|_| DEFAULT_METADATA_HOST.to_string());
        Self::with_base_url(format!("http://{}", host))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            token_url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            cached: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> Result<CachedToken> {
        tracing::debug!("Fetching access token from metadata server");

        let response = self
            .client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| SampleError::AuthError {
                message: format!("metadata server unreachable: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(SampleError::AuthError {
                message: format!("metadata server returned HTTP {}", response.status()),
            });
        }

        let token: MetadataToken = response.json().await?;
        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

impl Default for MetadataTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(current) = cached.as_ref() {
            if current.expires_at > Instant::now() + EXPIRY_MARGIN {
                return Ok(current.token.clone());
            }
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// 有設定 access token 就直接使用，否則改向 metadata server 取得
pub fn token_provider_from_config<C: ConfigProvider + ?Sized>(config: &C) -> Arc<dyn TokenProvider> {
    match config.access_token() {
        Some(token) if !token.trim().is_empty() => {
            tracing::debug!("Using configured access token");
            Arc::new(StaticTokenProvider::new(token))
        }
        _ => {
            tracing::debug!("No access token configured, using metadata server");
            Arc::new(MetadataTokenProvider::new())
        }
    }
}
