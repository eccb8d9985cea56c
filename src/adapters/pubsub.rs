use crate::adapters::http::ApiTransport;
use crate::domain::model::{PullResponse, ReceivedMessage, Subscription};
use crate::domain::ports::{PubsubApi, ReceiveSettings};
use crate::utils::error::{Result, SampleError};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

pub const DEFAULT_PUBSUB_ENDPOINT: &str = "https://pubsub.googleapis.com";
const API_VERSION: &str = "v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PullRequest {
    max_messages: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AcknowledgeRequest<'a> {
    ack_ids: &'a [String],
}

/// Pub/Sub 的 REST client，只涵蓋訂閱的建立與刪除、拉取與 ack
#[derive(Debug, Clone)]
pub struct PubsubClient {
    transport: ApiTransport,
    settings: ReceiveSettings,
}

impl PubsubClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self {
            transport,
            settings: ReceiveSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ReceiveSettings) -> Self {
        self.settings = settings;
        self
    }

    fn path(name: &str) -> String {
        format!("{}/{}", API_VERSION, name)
    }
}

#[async_trait]
impl PubsubApi for PubsubClient {
    async fn create_subscription(
        &self,
        name: &str,
        subscription: &Subscription,
    ) -> Result<Subscription> {
        let request = self
            .transport
            .request(Method::PUT, &Self::path(name))
            .await?
            .json(subscription);
        self.transport.send_json(request).await
    }

    async fn delete_subscription(&self, name: &str) -> Result<()> {
        let request = self.transport.request(Method::DELETE, &Self::path(name)).await?;
        self.transport.send_empty(request).await
    }

    async fn pull(&self, subscription: &str, max_messages: u32) -> Result<Vec<ReceivedMessage>> {
        let request = self
            .transport
            .request(Method::POST, &Self::path(&format!("{}:pull", subscription)))
            .await?
            .json(&PullRequest { max_messages });

        // 長輪詢逾時代表這段時間沒有訊息
        match self.transport.send_json::<PullResponse>(request).await {
            Ok(response) => Ok(response.received_messages),
            Err(SampleError::HttpError(e)) if e.is_timeout() => {
                tracing::debug!("Pull on {} timed out without messages", subscription);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()> {
        if ack_ids.is_empty() {
            return Ok(());
        }

        let request = self
            .transport
            .request(
                Method::POST,
                &Self::path(&format!("{}:acknowledge", subscription)),
            )
            .await?
            .json(&AcknowledgeRequest { ack_ids });
        self.transport.send_empty(request).await
    }

    fn receive_settings(&self) -> ReceiveSettings {
        self.settings
    }
}
