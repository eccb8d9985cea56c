use crate::config::{Settings, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::domain::ports::ReceiveSettings;
use crate::utils::error::{Result, SampleError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub pubsub: PubsubConfig,
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubsubConfig {
    pub endpoint: Option<String>,
    pub topic: Option<String>,
    pub max_messages: Option<u32>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub access_token: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SampleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SampleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_CLOUD_PROJECT})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SampleError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn is_unresolved(value: &str) -> bool {
        value.starts_with("${") && value.ends_with('}')
    }

    /// 轉成最終設定，未填的欄位使用預設值
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new(self.project.id.clone());

        if let Some(endpoint) = &self.analysis.endpoint {
            settings.analysis_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.pubsub.endpoint {
            settings.pubsub_endpoint = endpoint.clone();
        }
        if let Some(topic) = &self.pubsub.topic {
            settings.occurrence_topic = topic.clone();
        }
        settings.timeout_seconds = self
            .analysis
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        settings.access_token = self.access_token().map(str::to_string);
        settings.receive = self.receive_settings();

        settings
    }
}

impl ConfigProvider for TomlConfig {
    fn project_id(&self) -> &str {
        &self.project.id
    }

    fn analysis_endpoint(&self) -> &str {
        self.analysis
            .endpoint
            .as_deref()
            .unwrap_or(crate::adapters::analysis::DEFAULT_ANALYSIS_ENDPOINT)
    }

    fn pubsub_endpoint(&self) -> &str {
        self.pubsub
            .endpoint
            .as_deref()
            .unwrap_or(crate::adapters::pubsub::DEFAULT_PUBSUB_ENDPOINT)
    }

    fn occurrence_topic(&self) -> &str {
        self.pubsub
            .topic
            .as_deref()
            .unwrap_or(crate::domain::paths::OCCURRENCE_TOPIC_ID)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.analysis
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn access_token(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為沒有設定
        self.auth
            .as_ref()
            .and_then(|a| a.access_token.as_deref())
            .filter(|t| !t.trim().is_empty() && !Self::is_unresolved(t))
    }

    fn receive_settings(&self) -> ReceiveSettings {
        let defaults = ReceiveSettings::default();
        ReceiveSettings {
            max_messages: self.pubsub.max_messages.unwrap_or(defaults.max_messages),
            poll_interval: self
                .pubsub
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if Self::is_unresolved(&self.project.id) {
            return Err(SampleError::MissingConfigError {
                field: format!("project.id ({})", self.project.id),
            });
        }
        self.to_settings().validate()
    }
}
