use crate::adapters::analysis::AnalysisClient;
use crate::adapters::clients_from_config;
use crate::adapters::pubsub::PubsubClient;
use crate::app::output::{write_count, write_json, write_note, write_occurrences};
use crate::config::cli::{Command, OutputFormat};
use crate::config::Settings;
use crate::core::samples;
use crate::domain::model::{Occurrence, VulnerabilityDetails};
use crate::domain::paths::occurrence_path;
use crate::domain::ports::{AnalysisApi, PubsubApi};
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;

/// 沒有指定子命令時建立的 note
pub const DEFAULT_NOTE_ID: &str = "test3";

/// 把 CLI 子命令分派到對應的範例操作，結果寫到 `out`
pub struct SampleRunner<A: AnalysisApi, P: PubsubApi> {
    analysis: A,
    pubsub: P,
    project_id: String,
    topic_id: String,
    format: OutputFormat,
}

impl SampleRunner<AnalysisClient, PubsubClient> {
    pub fn from_settings(settings: &Settings, format: OutputFormat) -> Result<Self> {
        let (analysis, pubsub) = clients_from_config(settings)?;
        Ok(Self::new(
            analysis,
            pubsub,
            settings.project_id.clone(),
            settings.occurrence_topic.clone(),
            format,
        ))
    }
}

impl<A: AnalysisApi, P: PubsubApi> SampleRunner<A, P> {
    pub fn new(
        analysis: A,
        pubsub: P,
        project_id: String,
        topic_id: String,
        format: OutputFormat,
    ) -> Self {
        Self {
            analysis,
            pubsub,
            project_id,
            topic_id,
            format,
        }
    }

    /// 接受完整的 occurrence 名稱或單純的 ID
    fn occurrence_name(&self, occurrence: &str) -> String {
        if occurrence.contains('/') {
            occurrence.to_string()
        } else {
            occurrence_path(&self.project_id, occurrence)
        }
    }

    pub async fn run<W: Write>(&self, command: Option<Command>, out: &mut W) -> Result<()> {
        let project = self.project_id.as_str();

        let command = match command {
            Some(command) => command,
            None => {
                // 預設流程只建立示範 note，失敗時印出錯誤而不中止
                match samples::create_note(&self.analysis, DEFAULT_NOTE_ID, project).await {
                    Ok(note) => write_note(out, &note, self.format)?,
                    Err(e) => {
                        tracing::warn!("Creating default note failed: {}", e);
                        eprintln!("{}", e);
                    }
                }
                return Ok(());
            }
        };

        match command {
            Command::CreateNote { note_id } => {
                let note = samples::create_note(&self.analysis, &note_id, project).await?;
                write_note(out, &note, self.format)
            }
            Command::GetNote { note_id } => {
                let note = samples::get_note(&self.analysis, &note_id, project).await?;
                write_note(out, &note, self.format)
            }
            Command::UpdateNote {
                note_id,
                short_description,
                long_description,
            } => {
                let mut note = samples::get_note(&self.analysis, &note_id, project).await?;
                if let Some(short) = short_description {
                    note.short_description = short;
                }
                if let Some(long) = long_description {
                    note.long_description = long;
                }
                samples::update_note(&self.analysis, &note, &note_id, project).await?;
                let updated = samples::get_note(&self.analysis, &note_id, project).await?;
                write_note(out, &updated, self.format)
            }
            Command::DeleteNote { note_id } => {
                samples::delete_note(&self.analysis, &note_id, project).await?;
                write_json(out, &serde_json::json!({ "deleted": note_id }))
            }
            Command::CreateOccurrence { image_url, note_id } => {
                let created =
                    samples::create_occurrence(&self.analysis, &image_url, &note_id, project)
                        .await?;
                write_occurrences(out, &[created], self.format)
            }
            Command::GetOccurrence { occurrence } => {
                let name = self.occurrence_name(&occurrence);
                let found = samples::get_occurrence(&self.analysis, &name).await?;
                write_occurrences(out, &[found], self.format)
            }
            Command::UpdateOccurrence {
                occurrence,
                vulnerability_type,
            } => {
                let name = self.occurrence_name(&occurrence);
                let current = samples::get_occurrence(&self.analysis, &name).await?;
                let updated = Occurrence {
                    note_name: current.note_name,
                    resource_url: current.resource_url,
                    vulnerability_details: Some(VulnerabilityDetails {
                        r#type: vulnerability_type,
                        ..Default::default()
                    }),
                    ..Default::default()
                };
                samples::update_occurrence(&self.analysis, &updated, &name).await?;
                let retrieved = samples::get_occurrence(&self.analysis, &name).await?;
                write_occurrences(out, &[retrieved], self.format)
            }
            Command::DeleteOccurrence { occurrence } => {
                let name = self.occurrence_name(&occurrence);
                samples::delete_occurrence(&self.analysis, &name).await?;
                write_json(out, &serde_json::json!({ "deleted": name }))
            }
            Command::DiscoveryInfo { image_url } => {
                let discoveries =
                    samples::get_discovery_info(&self.analysis, &image_url, project).await?;
                write_occurrences(out, &discoveries, self.format)
            }
            Command::OccurrencesForNote { note_id } => {
                let count =
                    samples::get_occurrences_for_note(&self.analysis, &note_id, project).await?;
                write_count(out, "occurrences", count, self.format)
            }
            Command::OccurrencesForImage { image_url } => {
                let count =
                    samples::get_occurrences_for_image(&self.analysis, &image_url, project)
                        .await?;
                write_count(out, "occurrences", count, self.format)
            }
            Command::ListImageOccurrences { image_url } => {
                let occurrences = samples::list_occurrences(
                    &self.analysis,
                    project,
                    &samples::image_filter(&image_url),
                )
                .await?;
                write_occurrences(out, &occurrences, self.format)
            }
            Command::CreateSubscription { subscription_id } => {
                samples::create_topic_subscription(
                    &self.pubsub,
                    &subscription_id,
                    project,
                    &self.topic_id,
                )
                .await?;
                write_json(out, &serde_json::json!({ "subscription": subscription_id }))
            }
            Command::DeleteSubscription { subscription_id } => {
                samples::delete_subscription(&self.pubsub, &subscription_id, project).await?;
                write_json(out, &serde_json::json!({ "deleted": subscription_id }))
            }
            Command::Listen {
                subscription_id,
                timeout_seconds,
            } => {
                let count = samples::pubsub(
                    &self.pubsub,
                    &subscription_id,
                    Duration::from_secs(timeout_seconds),
                    project,
                )
                .await?;
                write_count(out, "messages", count, self.format)
            }
        }
    }
}
