//! 範例操作：每個函式建立請求、呼叫一次遠端方法，錯誤原樣往上傳。
//!
//! 列表類操作會跟著 `nextPageToken` 把所有分頁讀完。

use crate::domain::model::{Note, Occurrence, PubsubMessage, Subscription};
use crate::domain::paths::{
    note_path, project_path, subscription_path, topic_path, OCCURRENCE_TOPIC_ID,
};
use crate::domain::ports::{AnalysisApi, PubsubApi};
use crate::utils::error::{Result, SampleError};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub async fn create_note<A: AnalysisApi + ?Sized>(
    api: &A,
    note_id: &str,
    project_id: &str,
) -> Result<Note> {
    let parent = project_path(project_id);
    let note = api
        .create_note(&parent, note_id, &Note::vulnerability())
        .await?;
    tracing::info!("Created note {}", note.name);
    Ok(note)
}

pub async fn get_note<A: AnalysisApi + ?Sized>(
    api: &A,
    note_id: &str,
    project_id: &str,
) -> Result<Note> {
    api.get_note(&note_path(project_id, note_id)).await
}

pub async fn update_note<A: AnalysisApi + ?Sized>(
    api: &A,
    updated: &Note,
    note_id: &str,
    project_id: &str,
) -> Result<()> {
    let name = note_path(project_id, note_id);
    api.update_note(&name, updated).await?;
    tracing::info!("Updated note {}", name);
    Ok(())
}

pub async fn delete_note<A: AnalysisApi + ?Sized>(
    api: &A,
    note_id: &str,
    project_id: &str,
) -> Result<()> {
    let name = note_path(project_id, note_id);
    api.delete_note(&name).await?;
    tracing::info!("Deleted note {}", name);
    Ok(())
}

/// 在 image 上建立一筆屬於 `parent_note_id` 的漏洞 occurrence
pub async fn create_occurrence<A: AnalysisApi + ?Sized>(
    api: &A,
    image_url: &str,
    parent_note_id: &str,
    project_id: &str,
) -> Result<Occurrence> {
    let occurrence = Occurrence::vulnerability(
        note_path(project_id, parent_note_id),
        image_url.to_string(),
    );
    let created = api
        .create_occurrence(&project_path(project_id), &occurrence)
        .await?;
    tracing::info!("Created occurrence {} for {}", created.name, image_url);
    Ok(created)
}

pub async fn get_occurrence<A: AnalysisApi + ?Sized>(
    api: &A,
    occurrence_name: &str,
) -> Result<Occurrence> {
    api.get_occurrence(occurrence_name).await
}

pub async fn update_occurrence<A: AnalysisApi + ?Sized>(
    api: &A,
    updated: &Occurrence,
    occurrence_name: &str,
) -> Result<()> {
    api.update_occurrence(occurrence_name, updated).await?;
    tracing::info!("Updated occurrence {}", occurrence_name);
    Ok(())
}

pub async fn delete_occurrence<A: AnalysisApi + ?Sized>(
    api: &A,
    occurrence_name: &str,
) -> Result<()> {
    api.delete_occurrence(occurrence_name).await?;
    tracing::info!("Deleted occurrence {}", occurrence_name);
    Ok(())
}

pub fn image_filter(image_url: &str) -> String {
    format!("resourceUrl=\"{}\"", image_url)
}

pub fn discovery_filter(image_url: &str) -> String {
    format!("kind=\"DISCOVERY\" AND resourceUrl=\"{}\"", image_url)
}

/// 讀完所有分頁，回傳符合 filter 的 occurrences
pub async fn list_occurrences<A: AnalysisApi + ?Sized>(
    api: &A,
    project_id: &str,
    filter: &str,
) -> Result<Vec<Occurrence>> {
    let parent = project_path(project_id);
    let mut occurrences = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = api
            .list_occurrences(&parent, filter, page_token.as_deref())
            .await?;
        occurrences.extend(page.occurrences);

        if page.next_page_token.is_empty() {
            break;
        }
        page_token = Some(page.next_page_token);
    }

    Ok(occurrences)
}

/// 讀完所有分頁，回傳某個 note 的 occurrences
pub async fn list_note_occurrences<A: AnalysisApi + ?Sized>(
    api: &A,
    note_id: &str,
    project_id: &str,
) -> Result<Vec<Occurrence>> {
    let note_name = note_path(project_id, note_id);
    let mut occurrences = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = api
            .list_note_occurrences(&note_name, page_token.as_deref())
            .await?;
        occurrences.extend(page.occurrences);

        if page.next_page_token.is_empty() {
            break;
        }
        page_token = Some(page.next_page_token);
    }

    Ok(occurrences)
}

/// 取得 image 的 discovery occurrences（分析作業狀態）並逐筆記錄
pub async fn get_discovery_info<A: AnalysisApi + ?Sized>(
    api: &A,
    image_url: &str,
    project_id: &str,
) -> Result<Vec<Occurrence>> {
    let discoveries = list_occurrences(api, project_id, &discovery_filter(image_url)).await?;

    for occurrence in &discoveries {
        let status = occurrence
            .discovered
            .as_ref()
            .and_then(|d| d.analysis_status.as_deref())
            .unwrap_or("UNKNOWN");
        tracing::info!("{}: analysis status {}", occurrence.name, status);
    }

    Ok(discoveries)
}

pub async fn get_occurrences_for_note<A: AnalysisApi + ?Sized>(
    api: &A,
    note_id: &str,
    project_id: &str,
) -> Result<usize> {
    let occurrences = list_note_occurrences(api, note_id, project_id).await?;
    for occurrence in &occurrences {
        tracing::debug!("{}", occurrence.name);
    }
    Ok(occurrences.len())
}

pub async fn get_occurrences_for_image<A: AnalysisApi + ?Sized>(
    api: &A,
    image_url: &str,
    project_id: &str,
) -> Result<usize> {
    let occurrences = list_occurrences(api, project_id, &image_filter(image_url)).await?;
    for occurrence in &occurrences {
        tracing::debug!("{}", occurrence.name);
    }
    Ok(occurrences.len())
}

/// 訂閱分析服務的 occurrence 通知 topic。訂閱已存在時視為成功。
pub async fn create_occurrence_subscription<P: PubsubApi + ?Sized>(
    api: &P,
    subscription_id: &str,
    project_id: &str,
) -> Result<()> {
    create_topic_subscription(api, subscription_id, project_id, OCCURRENCE_TOPIC_ID).await
}

pub async fn create_topic_subscription<P: PubsubApi + ?Sized>(
    api: &P,
    subscription_id: &str,
    project_id: &str,
    topic_id: &str,
) -> Result<()> {
    let name = subscription_path(project_id, subscription_id);
    let subscription = Subscription {
        topic: topic_path(project_id, topic_id),
        ..Default::default()
    };

    match api.create_subscription(&name, &subscription).await {
        Ok(created) => {
            tracing::info!("Created subscription {} on {}", created.name, created.topic);
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            tracing::info!("Subscription {} already exists", name);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn delete_subscription<P: PubsubApi + ?Sized>(
    api: &P,
    subscription_id: &str,
    project_id: &str,
) -> Result<()> {
    let name = subscription_path(project_id, subscription_id);
    api.delete_subscription(&name).await?;
    tracing::info!("Deleted subscription {}", name);
    Ok(())
}

/// 在 `timeout` 內監聽訂閱，回傳收到的訊息數。
/// 截止時正在處理的批次會先 ack 完才返回，所以計數的訊息都已 ack。
pub async fn pubsub<P: PubsubApi + ?Sized>(
    api: &P,
    subscription_id: &str,
    timeout: Duration,
    project_id: &str,
) -> Result<usize> {
    if timeout.is_zero() {
        return Ok(0);
    }

    let name = subscription_path(project_id, subscription_id);
    let count = Mutex::new(0usize);

    let handler = |message: &PubsubMessage| {
        let mut received = match count.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *received += 1;

        match message.occurrence_notification() {
            Some(notification) => {
                tracing::info!("Message {}: {}", *received, notification.name)
            }
            None => tracing::info!("Message {}: {}", *received, message.message_id),
        }
    };

    tracing::info!("Listening on {} for {:?}", name, timeout);
    let deadline = Instant::now() + timeout;
    api.receive(&name, deadline, &handler).await?;
    tracing::debug!("Listening window on {} elapsed", name);

    let received = *count.lock().map_err(|_| SampleError::SubscriberError {
        message: "message counter lock poisoned".to_string(),
    })?;
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Discovered, Kind, ListNoteOccurrencesResponse, ListOccurrencesResponse, ReceivedMessage,
        VulnerabilityDetails,
    };
    use crate::domain::paths::{occurrence_path, resource_id};
    use crate::domain::ports::ReceiveSettings;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Arc;
    use tokio::sync::Mutex as AsyncMutex;

    /// 以記憶體模擬分析服務，分頁大小固定為 1
    #[derive(Clone, Default)]
    struct FakeAnalysis {
        notes: Arc<AsyncMutex<BTreeMap<String, Note>>>,
        occurrences: Arc<AsyncMutex<BTreeMap<String, Occurrence>>>,
        next_id: Arc<AsyncMutex<u32>>,
    }

    fn not_found(name: &str) -> SampleError {
        SampleError::NotFoundError {
            message: format!("{} not found", name),
        }
    }

    fn page_of(items: Vec<Occurrence>, page_token: Option<&str>) -> (Vec<Occurrence>, String) {
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let page: Vec<Occurrence> = items.iter().skip(start).take(1).cloned().collect();
        let next = if start + 1 < items.len() {
            (start + 1).to_string()
        } else {
            String::new()
        };
        (page, next)
    }

    fn quoted_value<'a>(filter: &'a str, key: &str) -> Option<&'a str> {
        let start = filter.find(&format!("{}=\"", key))? + key.len() + 2;
        let end = filter[start..].find('"')? + start;
        Some(&filter[start..end])
    }

    #[async_trait]
    impl AnalysisApi for FakeAnalysis {
        async fn create_note(&self, parent: &str, note_id: &str, note: &Note) -> Result<Note> {
            let name = format!("{}/notes/{}", parent, note_id);
            let mut notes = self.notes.lock().await;
            if notes.contains_key(&name) {
                return Err(SampleError::AlreadyExistsError { message: name });
            }
            let mut stored = note.clone();
            stored.name = name.clone();
            stored.kind = Some(Kind::PackageVulnerability);
            notes.insert(name, stored.clone());
            Ok(stored)
        }

        async fn get_note(&self, name: &str) -> Result<Note> {
            self.notes
                .lock()
                .await
                .get(name)
                .cloned()
                .ok_or_else(|| not_found(name))
        }

        async fn update_note(&self, name: &str, note: &Note) -> Result<Note> {
            let mut notes = self.notes.lock().await;
            let stored = notes.get_mut(name).ok_or_else(|| not_found(name))?;
            stored.short_description = note.short_description.clone();
            stored.long_description = note.long_description.clone();
            Ok(stored.clone())
        }

        async fn delete_note(&self, name: &str) -> Result<()> {
            self.notes
                .lock()
                .await
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| not_found(name))
        }

        async fn create_occurrence(
            &self,
            parent: &str,
            occurrence: &Occurrence,
        ) -> Result<Occurrence> {
            if !self.notes.lock().await.contains_key(&occurrence.note_name) {
                return Err(SampleError::ApiError {
                    status: 400,
                    code: "INVALID_ARGUMENT".to_string(),
                    message: "note does not exist".to_string(),
                });
            }
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            let mut stored = occurrence.clone();
            stored.name = format!("{}/occurrences/occ-{}", parent, *next_id);
            if stored.kind.is_none() {
                stored.kind = Some(Kind::PackageVulnerability);
            }
            self.occurrences
                .lock()
                .await
                .insert(stored.name.clone(), stored.clone());
            Ok(stored)
        }

        async fn get_occurrence(&self, name: &str) -> Result<Occurrence> {
            self.occurrences
                .lock()
                .await
                .get(name)
                .cloned()
                .ok_or_else(|| not_found(name))
        }

        async fn update_occurrence(
            &self,
            name: &str,
            occurrence: &Occurrence,
        ) -> Result<Occurrence> {
            let mut occurrences = self.occurrences.lock().await;
            let stored = occurrences.get_mut(name).ok_or_else(|| not_found(name))?;
            stored.vulnerability_details = occurrence.vulnerability_details.clone();
            Ok(stored.clone())
        }

        async fn delete_occurrence(&self, name: &str) -> Result<()> {
            self.occurrences
                .lock()
                .await
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| not_found(name))
        }

        async fn list_occurrences(
            &self,
            _parent: &str,
            filter: &str,
            page_token: Option<&str>,
        ) -> Result<ListOccurrencesResponse> {
            let resource = quoted_value(filter, "resourceUrl");
            let kind = quoted_value(filter, "kind");
            let matching: Vec<Occurrence> = self
                .occurrences
                .lock()
                .await
                .values()
                .filter(|o| resource.map_or(true, |r| o.resource_url == r))
                .filter(|o| {
                    kind.map_or(true, |k| {
                        k == "DISCOVERY" && o.kind == Some(Kind::Discovery)
                    })
                })
                .cloned()
                .collect();
            let (occurrences, next_page_token) = page_of(matching, page_token);
            Ok(ListOccurrencesResponse {
                occurrences,
                next_page_token,
            })
        }

        async fn list_note_occurrences(
            &self,
            note_name: &str,
            page_token: Option<&str>,
        ) -> Result<ListNoteOccurrencesResponse> {
            let matching: Vec<Occurrence> = self
                .occurrences
                .lock()
                .await
                .values()
                .filter(|o| o.note_name == note_name)
                .cloned()
                .collect();
            let (occurrences, next_page_token) = page_of(matching, page_token);
            Ok(ListNoteOccurrencesResponse {
                occurrences,
                next_page_token,
            })
        }
    }

    /// 依序回傳預先排好的批次，之後一律回傳空批次
    #[derive(Default)]
    struct FakePubsub {
        batches: AsyncMutex<VecDeque<Vec<ReceivedMessage>>>,
        acked: AsyncMutex<Vec<String>>,
        ack_delay: Duration,
        subscriptions: AsyncMutex<BTreeMap<String, Subscription>>,
    }

    impl FakePubsub {
        fn with_batches(batches: Vec<Vec<ReceivedMessage>>) -> Self {
            Self {
                batches: AsyncMutex::new(batches.into()),
                ..Default::default()
            }
        }
    }

    fn received(ack_id: &str) -> ReceivedMessage {
        ReceivedMessage {
            ack_id: ack_id.to_string(),
            message: PubsubMessage {
                message_id: format!("msg-{}", ack_id),
                ..Default::default()
            },
        }
    }

    #[async_trait]
    impl PubsubApi for FakePubsub {
        async fn create_subscription(
            &self,
            name: &str,
            subscription: &Subscription,
        ) -> Result<Subscription> {
            let mut subscriptions = self.subscriptions.lock().await;
            if subscriptions.contains_key(name) {
                return Err(SampleError::AlreadyExistsError {
                    message: "Resource already exists in the project".to_string(),
                });
            }
            let mut stored = subscription.clone();
            stored.name = name.to_string();
            subscriptions.insert(name.to_string(), stored.clone());
            Ok(stored)
        }

        async fn delete_subscription(&self, name: &str) -> Result<()> {
            self.subscriptions
                .lock()
                .await
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| not_found(name))
        }

        async fn pull(&self, subscription: &str, _max: u32) -> Result<Vec<ReceivedMessage>> {
            if !self.subscriptions.lock().await.contains_key(subscription) {
                return Err(not_found(subscription));
            }
            Ok(self.batches.lock().await.pop_front().unwrap_or_default())
        }

        async fn acknowledge(&self, _subscription: &str, ack_ids: &[String]) -> Result<()> {
            tokio::time::sleep(self.ack_delay).await;
            self.acked.lock().await.extend_from_slice(ack_ids);
            Ok(())
        }

        fn receive_settings(&self) -> ReceiveSettings {
            ReceiveSettings {
                max_messages: 10,
                poll_interval: Duration::from_millis(10),
            }
        }
    }

    const PROJECT: &str = "test-project";

    #[tokio::test]
    async fn test_create_note_then_get_returns_same_name() {
        let api = FakeAnalysis::default();
        let created = create_note(&api, "note-1", PROJECT).await.unwrap();
        let fetched = get_note(&api, "note-1", PROJECT).await.unwrap();

        assert_eq!(created.name, "projects/test-project/notes/note-1");
        assert_eq!(fetched.name, created.name);
        assert!(fetched.vulnerability_type.is_some());
    }

    #[tokio::test]
    async fn test_get_note_fails_after_delete() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();
        delete_note(&api, "note-1", PROJECT).await.unwrap();

        let err = get_note(&api, "note-1", PROJECT).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_note_short_description() {
        let api = FakeAnalysis::default();
        let mut note = create_note(&api, "note-1", PROJECT).await.unwrap();

        note.short_description = "updated".to_string();
        update_note(&api, &note, "note-1", PROJECT).await.unwrap();

        let updated = get_note(&api, "note-1", PROJECT).await.unwrap();
        assert_eq!(updated.short_description, "updated");
    }

    #[tokio::test]
    async fn test_create_occurrence_links_note_and_image() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();

        let created = create_occurrence(&api, "www.image.com", "note-1", PROJECT)
            .await
            .unwrap();
        let retrieved = get_occurrence(&api, &created.name).await.unwrap();

        assert_eq!(retrieved.name, created.name);
        assert_eq!(retrieved.note_name, "projects/test-project/notes/note-1");
        assert_eq!(retrieved.resource_url, "www.image.com");
    }

    #[tokio::test]
    async fn test_get_occurrence_fails_after_delete() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();
        let created = create_occurrence(&api, "www.image.com", "note-1", PROJECT)
            .await
            .unwrap();

        delete_occurrence(&api, &created.name).await.unwrap();
        assert!(get_occurrence(&api, &created.name).await.is_err());
    }

    #[tokio::test]
    async fn test_update_occurrence_vulnerability_type() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();
        let created = create_occurrence(&api, "www.image.com", "note-1", PROJECT)
            .await
            .unwrap();

        let updated = Occurrence {
            note_name: created.note_name.clone(),
            resource_url: created.resource_url.clone(),
            vulnerability_details: Some(VulnerabilityDetails {
                r#type: "updated".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        update_occurrence(&api, &updated, &created.name).await.unwrap();

        let retrieved = get_occurrence(&api, &created.name).await.unwrap();
        assert_eq!(retrieved.vulnerability_details.unwrap().r#type, "updated");
    }

    #[tokio::test]
    async fn test_occurrence_counts_follow_all_pages() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();
        create_note(&api, "note-2", PROJECT).await.unwrap();

        assert_eq!(get_occurrences_for_image(&api, "www.a.com", PROJECT).await.unwrap(), 0);
        assert_eq!(get_occurrences_for_note(&api, "note-1", PROJECT).await.unwrap(), 0);

        for _ in 0..3 {
            create_occurrence(&api, "www.a.com", "note-1", PROJECT).await.unwrap();
        }
        create_occurrence(&api, "www.b.com", "note-2", PROJECT).await.unwrap();

        assert_eq!(get_occurrences_for_image(&api, "www.a.com", PROJECT).await.unwrap(), 3);
        assert_eq!(get_occurrences_for_image(&api, "www.b.com", PROJECT).await.unwrap(), 1);
        assert_eq!(get_occurrences_for_note(&api, "note-1", PROJECT).await.unwrap(), 3);
        assert_eq!(get_occurrences_for_note(&api, "note-2", PROJECT).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_discovery_info_only_returns_discovery_occurrences() {
        let api = FakeAnalysis::default();
        create_note(&api, "note-1", PROJECT).await.unwrap();
        create_occurrence(&api, "www.a.com", "note-1", PROJECT).await.unwrap();

        let discovery = Occurrence {
            note_name: note_path(PROJECT, "note-1"),
            resource_url: "www.a.com".to_string(),
            kind: Some(Kind::Discovery),
            discovered: Some(Discovered {
                analysis_status: Some("FINISHED_SUCCESS".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        api.create_occurrence(&project_path(PROJECT), &discovery)
            .await
            .unwrap();

        let found = get_discovery_info(&api, "www.a.com", PROJECT).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, Some(Kind::Discovery));
    }

    #[tokio::test]
    async fn test_create_occurrence_subscription_is_idempotent() {
        let api = FakePubsub::default();
        create_occurrence_subscription(&api, "sub-1", PROJECT).await.unwrap();
        create_occurrence_subscription(&api, "sub-1", PROJECT).await.unwrap();

        let subscriptions = api.subscriptions.lock().await;
        let stored = subscriptions
            .get(&subscription_path(PROJECT, "sub-1"))
            .unwrap();
        assert_eq!(
            stored.topic,
            "projects/test-project/topics/container-analysis-occurrences-v1alpha1"
        );
    }

    #[tokio::test]
    async fn test_listen_after_subscription_deleted_fails() {
        let api = FakePubsub::with_batches(vec![vec![received("a1")]]);
        create_occurrence_subscription(&api, "sub-1", PROJECT).await.unwrap();
        delete_subscription(&api, "sub-1", PROJECT).await.unwrap();

        let err = pubsub(&api, "sub-1", Duration::from_millis(100), PROJECT)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(api.acked.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_pubsub_counts_and_acks_messages_within_timeout() {
        let api = FakePubsub::with_batches(vec![
            vec![received("a1"), received("a2")],
            vec![],
            vec![received("a3")],
        ]);
        create_occurrence_subscription(&api, "sub-1", PROJECT).await.unwrap();

        let count = pubsub(&api, "sub-1", Duration::from_millis(200), PROJECT)
            .await
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(*api.acked.lock().await, vec!["a1", "a2", "a3"]);
    }

    #[tokio::test]
    async fn test_pubsub_finishes_ack_of_handled_batch_past_timeout() {
        let api = FakePubsub {
            ack_delay: Duration::from_millis(300),
            ..FakePubsub::with_batches(vec![vec![received("a1"), received("a2")]])
        };
        create_occurrence_subscription(&api, "sub-1", PROJECT).await.unwrap();

        let count = pubsub(&api, "sub-1", Duration::from_millis(100), PROJECT)
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(*api.acked.lock().await, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_pubsub_zero_timeout_returns_zero() {
        let api = FakePubsub::with_batches(vec![vec![received("a1")]]);
        let count = pubsub(&api, "sub-1", Duration::ZERO, PROJECT).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_pubsub_missing_subscription_propagates_error() {
        let api = FakePubsub::default();
        let err = pubsub(&api, "nope", Duration::from_millis(100), PROJECT)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_filters() {
        assert_eq!(image_filter("www.a.com"), "resourceUrl=\"www.a.com\"");
        assert_eq!(
            discovery_filter("www.a.com"),
            "kind=\"DISCOVERY\" AND resourceUrl=\"www.a.com\""
        );
        assert_eq!(resource_id(&occurrence_path(PROJECT, "abc")), "abc");
    }
}
