use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "container-analysis-samples")]
#[command(about = "Sample calls against the container analysis API and its Pub/Sub occurrence feed")]
pub struct CliConfig {
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT", help = "Project that owns the notes and occurrences")]
    pub project: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override the analysis API endpoint")]
    pub analysis_endpoint: Option<String>,

    #[arg(long, help = "Override the Pub/Sub API endpoint")]
    pub pubsub_endpoint: Option<String>,

    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create a vulnerability note
    CreateNote { note_id: String },
    /// Fetch a note
    GetNote { note_id: String },
    /// Update a note's descriptions
    UpdateNote {
        note_id: String,
        #[arg(long)]
        short_description: Option<String>,
        #[arg(long)]
        long_description: Option<String>,
    },
    /// Delete a note
    DeleteNote { note_id: String },
    /// Record a note against an image
    CreateOccurrence { image_url: String, note_id: String },
    /// Fetch an occurrence by full name or ID
    GetOccurrence { occurrence: String },
    /// Set the vulnerability type of an occurrence
    UpdateOccurrence {
        occurrence: String,
        #[arg(long)]
        vulnerability_type: String,
    },
    /// Delete an occurrence by full name or ID
    DeleteOccurrence { occurrence: String },
    /// Show discovery (analysis status) occurrences for an image
    DiscoveryInfo { image_url: String },
    /// Count occurrences of a note
    OccurrencesForNote { note_id: String },
    /// Count occurrences on an image
    OccurrencesForImage { image_url: String },
    /// List occurrences on an image
    ListImageOccurrences { image_url: String },
    /// Subscribe to occurrence notifications
    CreateSubscription { subscription_id: String },
    /// Delete a subscription
    DeleteSubscription { subscription_id: String },
    /// Count occurrence notifications received within a time window
    Listen {
        subscription_id: String,
        #[arg(long, default_value = "20")]
        timeout_seconds: u64,
    },
}

impl CliConfig {
    /// 合併設定：TOML 檔為基礎，命令列參數覆寫
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                let mut settings = file.to_settings();
                if let Some(project) = &self.project {
                    settings.project_id = project.clone();
                }
                settings
            }
            None => {
                let project = validate_required_field(
                    "project (--project or GOOGLE_CLOUD_PROJECT)",
                    &self.project,
                )?;
                Settings::new(project.clone())
            }
        };

        if let Some(endpoint) = &self.analysis_endpoint {
            settings.analysis_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.pubsub_endpoint {
            settings.pubsub_endpoint = endpoint.clone();
        }
        if let Some(token) = self.access_token.as_ref().filter(|t| !t.trim().is_empty()) {
            settings.access_token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }

        Ok(settings)
    }
}
