//! 資源名稱組合，格式皆為 `projects/{project}/...`

/// 分析服務發佈 occurrence 變更通知的 topic 名稱
pub const OCCURRENCE_TOPIC_ID: &str = "container-analysis-occurrences-v1alpha1";

pub fn project_path(project_id: &str) -> String {
    format!("projects/{}", project_id)
}

pub fn note_path(project_id: &str, note_id: &str) -> String {
    format!("projects/{}/notes/{}", project_id, note_id)
}

pub fn occurrence_path(project_id: &str, occurrence_id: &str) -> String {
    format!("projects/{}/occurrences/{}", project_id, occurrence_id)
}

pub fn topic_path(project_id: &str, topic_id: &str) -> String {
    format!("projects/{}/topics/{}", project_id, topic_id)
}

pub fn subscription_path(project_id: &str, subscription_id: &str) -> String {
    format!("projects/{}/subscriptions/{}", project_id, subscription_id)
}

/// 取出資源名稱的最後一段，例如 occurrence 名稱中的 ID
pub fn resource_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
