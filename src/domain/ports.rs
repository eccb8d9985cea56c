use crate::domain::model::{
    ListNoteOccurrencesResponse, ListOccurrencesResponse, Note, Occurrence, PubsubMessage,
    ReceivedMessage, Subscription,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

pub trait ConfigProvider: Send + Sync {
    fn project_id(&self) -> &str;
    fn analysis_endpoint(&self) -> &str;
    fn pubsub_endpoint(&self) -> &str;
    fn occurrence_topic(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn access_token(&self) -> Option<&str>;

    fn receive_settings(&self) -> ReceiveSettings {
        ReceiveSettings::default()
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// 漏洞分析服務的遠端方法，名稱參數皆為完整資源名稱
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn create_note(&self, parent: &str, note_id: &str, note: &Note) -> Result<Note>;
    async fn get_note(&self, name: &str) -> Result<Note>;
    async fn update_note(&self, name: &str, note: &Note) -> Result<Note>;
    async fn delete_note(&self, name: &str) -> Result<()>;

    async fn create_occurrence(&self, parent: &str, occurrence: &Occurrence)
        -> Result<Occurrence>;
    async fn get_occurrence(&self, name: &str) -> Result<Occurrence>;
    async fn update_occurrence(&self, name: &str, occurrence: &Occurrence)
        -> Result<Occurrence>;
    async fn delete_occurrence(&self, name: &str) -> Result<()>;

    async fn list_occurrences(
        &self,
        parent: &str,
        filter: &str,
        page_token: Option<&str>,
    ) -> Result<ListOccurrencesResponse>;
    async fn list_note_occurrences(
        &self,
        note_name: &str,
        page_token: Option<&str>,
    ) -> Result<ListNoteOccurrencesResponse>;
}

/// 接收迴圈的參數
#[derive(Debug, Clone, Copy)]
pub struct ReceiveSettings {
    pub max_messages: u32,
    pub poll_interval: Duration,
}

impl Default for ReceiveSettings {
    fn default() -> Self {
        Self {
            max_messages: 10,
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[async_trait]
pub trait PubsubApi: Send + Sync {
    async fn create_subscription(
        &self,
        name: &str,
        subscription: &Subscription,
    ) -> Result<Subscription>;
    async fn delete_subscription(&self, name: &str) -> Result<()>;
    async fn pull(&self, subscription: &str, max_messages: u32) -> Result<Vec<ReceivedMessage>>;
    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()>;

    fn receive_settings(&self) -> ReceiveSettings {
        ReceiveSettings::default()
    }

    /// 持續拉取訊息並逐則交給 handler，每批處理完即 ack，到 `deadline` 為止。
    /// 只有等待中的 pull 會被截止時間中斷；已交給 handler 的批次一定會 ack 完才返回。
    async fn receive(
        &self,
        subscription: &str,
        deadline: Instant,
        handler: &(dyn for<'m> Fn(&'m PubsubMessage) + Send + Sync),
    ) -> Result<()> {
        let settings = self.receive_settings();

        while Instant::now() < deadline {
            let pull = self.pull(subscription, settings.max_messages);
            let messages = match tokio::time::timeout_at(deadline, pull).await {
                Ok(pulled) => pulled?,
                Err(_) => break,
            };
            if messages.is_empty() {
                tokio::time::sleep_until(deadline.min(Instant::now() + settings.poll_interval))
                    .await;
                continue;
            }

            tracing::debug!("Pulled {} messages from {}", messages.len(), subscription);

            let mut ack_ids = Vec::with_capacity(messages.len());
            for received in &messages {
                handler(&received.message);
                ack_ids.push(received.ack_id.clone());
            }

            self.acknowledge(subscription, &ack_ids).await?;
        }

        Ok(())
    }
}
