use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 分析服務記錄的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    KindUnspecified,
    PackageVulnerability,
    BuildDetails,
    ImageBasis,
    PackageManager,
    Deployable,
    Discovery,
    AttestationAuthority,
    /// 服務新增、本程式尚未認得的種類
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    SeverityUnspecified,
    Minimal,
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

/// Note：描述一類漏洞發現的伺服端記錄
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_url: Vec<RelatedUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_type: Option<VulnerabilityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery: Option<Discovery>,
}

impl Note {
    /// 以空的漏洞類型建立 note，伺服端會依此將其歸類為 PACKAGE_VULNERABILITY
    pub fn vulnerability() -> Self {
        Self {
            vulnerability_type: Some(VulnerabilityType::default()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedUrl {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Detail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cpe_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_affected_version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_affected_version: Option<Version>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<i32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Discovery note 的內容：描述哪一類分析會被執行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_kind: Option<Kind>,
}

/// Occurrence：某個 note 在特定資源（例如容器映像）上的偵測結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability_details: Option<VulnerabilityDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered: Option<Discovered>,
}

impl Occurrence {
    pub fn vulnerability(note_name: String, resource_url: String) -> Self {
        Self {
            note_name,
            resource_url,
            vulnerability_details: Some(VulnerabilityDetails::default()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityDetails {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_issue: Vec<PackageIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_location: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_location: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity_name: String,
}

/// Discovery occurrence 的內容：分析作業的狀態
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovered {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous_analysis: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOccurrencesResponse {
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNoteOccurrencesResponse {
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
    #[serde(default)]
    pub next_page_token: String,
}

/// 訂閱：指向某個 topic 訊息串流的具名持久指標
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_deadline_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// base64 編碼的訊息內容
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<DateTime<Utc>>,
}

impl PubsubMessage {
    pub fn decoded_data(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    /// 分析服務推送的 occurrence 通知是 JSON，解不開時回傳 None
    pub fn occurrence_notification(&self) -> Option<OccurrenceNotification> {
        let bytes = self.decoded_data().ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub ack_id: String,
    pub message: PubsubMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    #[serde(default)]
    pub received_messages: Vec<ReceivedMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceNotification {
    pub name: String,
    #[serde(default)]
    pub kind: Option<Kind>,
    #[serde(default)]
    pub notification_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vulnerability_note_serializes_empty_type() {
        let json = serde_json::to_value(Note::vulnerability()).unwrap();
        assert_eq!(json, serde_json::json!({"vulnerabilityType": {}}));
    }

    #[test]
    fn test_occurrence_wire_names() {
        let mut occurrence = Occurrence::vulnerability(
            "projects/p/notes/n".to_string(),
            "www.image.com".to_string(),
        );
        occurrence
            .vulnerability_details
            .as_mut()
            .unwrap()
            .r#type = "updated".to_string();

        let json = serde_json::to_value(&occurrence).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "noteName": "projects/p/notes/n",
                "resourceUrl": "www.image.com",
                "vulnerabilityDetails": {"type": "updated"}
            })
        );
    }

    #[test]
    fn test_occurrence_tolerates_unknown_fields() {
        let body = r#"{
            "name": "projects/p/occurrences/abc",
            "kind": "DISCOVERY",
            "createTime": "2018-07-16T19:36:54.123456Z",
            "discovered": {"analysisStatus": "FINISHED_SUCCESS"},
            "somethingNew": 1
        }"#;
        let occurrence: Occurrence = serde_json::from_str(body).unwrap();
        assert_eq!(occurrence.kind, Some(Kind::Discovery));
        assert_eq!(
            occurrence.discovered.unwrap().analysis_status.as_deref(),
            Some("FINISHED_SUCCESS")
        );
        assert!(occurrence.create_time.is_some());
    }

    #[test]
    fn test_list_response_with_unlisted_kinds() {
        let body = r#"{
            "occurrences": [
                {"name": "projects/p/occurrences/a", "kind": "PACKAGE_VULNERABILITY"},
                {"name": "projects/p/occurrences/b", "kind": "ATTESTATION_AUTHORITY"},
                {"name": "projects/p/occurrences/c", "kind": "SOMETHING_LATER",
                 "vulnerabilityDetails": {"severity": "NOT_YET_DEFINED"}}
            ]
        }"#;
        let page: ListOccurrencesResponse = serde_json::from_str(body).unwrap();
        let kinds: Vec<_> = page.occurrences.iter().map(|o| o.kind).collect();

        assert_eq!(
            kinds,
            vec![
                Some(Kind::PackageVulnerability),
                Some(Kind::AttestationAuthority),
                Some(Kind::Unknown),
            ]
        );
        assert_eq!(
            page.occurrences[2]
                .vulnerability_details
                .as_ref()
                .and_then(|d| d.severity),
            Some(Severity::Unknown)
        );
    }

    #[test]
    fn test_pubsub_message_notification() {
        let payload = r#"{"name":"projects/p/occurrences/o1","kind":"PACKAGE_VULNERABILITY"}"#;
        let message = PubsubMessage {
            data: STANDARD.encode(payload),
            message_id: "1".to_string(),
            ..Default::default()
        };
        let notification = message.occurrence_notification().unwrap();
        assert_eq!(notification.name, "projects/p/occurrences/o1");
        assert_eq!(notification.kind, Some(Kind::PackageVulnerability));
    }

    #[test]
    fn test_pubsub_message_with_invalid_data() {
        let message = PubsubMessage {
            data: "not base64!".to_string(),
            ..Default::default()
        };
        assert!(message.decoded_data().is_err());
        assert!(message.occurrence_notification().is_none());
    }
}
