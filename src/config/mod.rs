#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::analysis::DEFAULT_ANALYSIS_ENDPOINT;
use crate::adapters::pubsub::DEFAULT_PUBSUB_ENDPOINT;
use crate::core::ConfigProvider;
use crate::domain::paths::OCCURRENCE_TOPIC_ID;
use crate::domain::ports::ReceiveSettings;
use crate::utils::error::{Result, SampleError};
use crate::utils::validation::{
    validate_range, validate_resource_id, validate_url, Validate,
};
use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 合併 CLI、TOML 與環境變數後的最終設定
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_id: String,
    pub analysis_endpoint: String,
    pub pubsub_endpoint: String,
    pub occurrence_topic: String,
    pub timeout_seconds: u64,
    pub access_token: Option<String>,
    pub receive: ReceiveSettings,
}

impl Settings {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            analysis_endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            pubsub_endpoint: DEFAULT_PUBSUB_ENDPOINT.to_string(),
            occurrence_topic: OCCURRENCE_TOPIC_ID.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            access_token: None,
            receive: ReceiveSettings::default(),
        }
    }

    /// 從環境變數建立設定，`GOOGLE_CLOUD_PROJECT` 為必填
    pub fn from_env() -> Result<Self> {
        let project_id = env::var("GOOGLE_CLOUD_PROJECT").map_err(|_| SampleError::ConfigError {
            message: "GOOGLE_CLOUD_PROJECT environment variable is required".to_string(),
        })?;

        let mut settings = Self::new(project_id);
        if let Ok(endpoint) = env::var("CONTAINER_ANALYSIS_ENDPOINT") {
            settings.analysis_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("PUBSUB_ENDPOINT") {
            settings.pubsub_endpoint = endpoint;
        }
        settings.access_token = env::var("GOOGLE_OAUTH_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        settings.timeout_seconds = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Ok(settings)
    }
}

impl ConfigProvider for Settings {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn analysis_endpoint(&self) -> &str {
        &self.analysis_endpoint
    }

    fn pubsub_endpoint(&self) -> &str {
        &self.pubsub_endpoint
    }

    fn occurrence_topic(&self) -> &str {
        &self.occurrence_topic
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn receive_settings(&self) -> ReceiveSettings {
        self.receive
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_resource_id("project_id", &self.project_id)?;
        validate_url("analysis.endpoint", &self.analysis_endpoint)?;
        validate_url("pubsub.endpoint", &self.pubsub_endpoint)?;
        validate_resource_id("pubsub.topic", &self.occurrence_topic)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 3600)?;
        validate_range("pubsub.max_messages", self.receive.max_messages, 1, 1000)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
