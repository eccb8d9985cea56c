use crate::adapters::http::ApiTransport;
use crate::domain::model::{
    ListNoteOccurrencesResponse, ListOccurrencesResponse, Note, Occurrence,
};
use crate::domain::ports::AnalysisApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://containeranalysis.googleapis.com";
const API_VERSION: &str = "v1alpha1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

/// 漏洞分析服務的 REST client
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    transport: ApiTransport,
}

impl AnalysisClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    fn path(name: &str) -> String {
        format!("{}/{}", API_VERSION, name)
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn create_note(&self, parent: &str, note_id: &str, note: &Note) -> Result<Note> {
        let request = self
            .transport
            .request(Method::POST, &Self::path(&format!("{}/notes", parent)))
            .await?
            .query(&[("noteId", note_id)])
            .json(note);
        self.transport.send_json(request).await
    }

    async fn get_note(&self, name: &str) -> Result<Note> {
        let request = self.transport.request(Method::GET, &Self::path(name)).await?;
        self.transport.send_json(request).await
    }

    async fn update_note(&self, name: &str, note: &Note) -> Result<Note> {
        let request = self
            .transport
            .request(Method::PATCH, &Self::path(name))
            .await?
            .json(note);
        self.transport.send_json(request).await
    }

    async fn delete_note(&self, name: &str) -> Result<()> {
        let request = self.transport.request(Method::DELETE, &Self::path(name)).await?;
        self.transport.send_empty(request).await
    }

    async fn create_occurrence(
        &self,
        parent: &str,
        occurrence: &Occurrence,
    ) -> Result<Occurrence> {
        let request = self
            .transport
            .request(Method::POST, &Self::path(&format!("{}/occurrences", parent)))
            .await?
            .json(occurrence);
        self.transport.send_json(request).await
    }

    async fn get_occurrence(&self, name: &str) -> Result<Occurrence> {
        let request = self.transport.request(Method::GET, &Self::path(name)).await?;
        self.transport.send_json(request).await
    }

    async fn update_occurrence(&self, name: &str, occurrence: &Occurrence) -> Result<Occurrence> {
        let request = self
            .transport
            .request(Method::PATCH, &Self::path(name))
            .await?
            .json(occurrence);
        self.transport.send_json(request).await
    }

    async fn delete_occurrence(&self, name: &str) -> Result<()> {
        let request = self.transport.request(Method::DELETE, &Self::path(name)).await?;
        self.transport.send_empty(request).await
    }

    async fn list_occurrences(
        &self,
        parent: &str,
        filter: &str,
        page_token: Option<&str>,
    ) -> Result<ListOccurrencesResponse> {
        let query = ListQuery {
            filter: Some(filter).filter(|f| !f.is_empty()),
            page_token,
        };
        let request = self
            .transport
            .request(Method::GET, &Self::path(&format!("{}/occurrences", parent)))
            .await?
            .query(&query);
        self.transport.send_json(request).await
    }

    async fn list_note_occurrences(
        &self,
        note_name: &str,
        page_token: Option<&str>,
    ) -> Result<ListNoteOccurrencesResponse> {
        let query = ListQuery {
            filter: None,
            page_token,
        };
        let request = self
            .transport
            .request(Method::GET, &Self::path(&format!("{}/occurrences", note_name)))
            .await?
            .query(&query);
        self.transport.send_json(request).await
    }
}
