//! Client for the diagram endpoints.
//!
//! Every call here goes out with the session bearer token and comes back
//! wrapped in the response envelope; this module unwraps envelopes so the
//! collection manager only ever sees `Result` values.
use async_trait::async_trait;
use log::{debug, error, trace};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    ApiResponse, Diagram, DiagramBackend, DiagramCreateRequest, DiagramPage, DiagramPatch,
    DiaglabError, ExportOptions, GenerateRequest, GeneratedPreview, PaginatedResponse,
    RemoteSource, Result, ValidationReport,
};

/// HTTP implementation of [`DiagramBackend`].
pub struct DiagramApi {
    base_url: String,
    token: String,
    client: Client,
}

impl DiagramApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        DiagramApi {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Status check plus JSON parse of the response body. Non-2xx responses
    /// are mapped onto the envelope failure message when the body carries
    /// one.
    async fn read_body<E: DeserializeOwned>(&self, response: Response) -> Result<E> {
        let status = response.status();
        let body = response.text().await?;
        trace!("Response status {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = failure_message_from_body(&body, status);
            error!("Service rejected request: {}", message);
            return Err(DiaglabError::Api { message });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn read_envelope<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let envelope: ApiResponse<T> = self.read_body(response).await?;
        envelope.into_result()
    }
}

fn failure_message_from_body(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .map(|envelope| envelope.failure_message())
        .unwrap_or_else(|_| format!("request failed with status {}", status))
}

#[async_trait]
impl DiagramBackend for DiagramApi {
    async fn list(&self, page: u32, limit: u32) -> Result<DiagramPage> {
        let url = self.url(&format!("/diagrams?page={page}&limit={limit}"));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;

        let envelope: PaginatedResponse<Diagram> = self.read_body(response).await?;
        let (items, pagination) = envelope.into_result(page, limit)?;
        Ok(DiagramPage {
            items,
            total: pagination.total,
            page: pagination.page,
            limit: pagination.limit,
        })
    }

    async fn get(&self, id: &str) -> Result<Diagram> {
        let url = self.url(&format!("/diagrams/{id}"));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedPreview> {
        let url = self.url("/diagrams/generate");
        debug!("POST {} ({} source)", url, request.diagram_type);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn create(&self, request: &DiagramCreateRequest) -> Result<Diagram> {
        let url = self.url("/diagrams");
        debug!("POST {} ({})", url, request.title);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn update(&self, id: &str, patch: &DiagramPatch) -> Result<Diagram> {
        let url = self.url(&format!("/diagrams/{id}"));
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.bearer())
            .json(patch)
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("/diagrams/{id}"));
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let envelope: ApiResponse<serde_json::Value> = self.read_body(response).await?;
        envelope.into_unit_result()
    }

    async fn export(&self, id: &str, options: &ExportOptions) -> Result<Vec<u8>> {
        let url = self.url(&format!("/diagrams/{id}/export"));
        debug!("POST {} ({})", url, options.format);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(options)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message_from_body(&body, status);
            error!("Export rejected: {}", message);
            return Err(DiaglabError::Api { message });
        }

        let bytes = response.bytes().await?;
        debug!("Export payload: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn validate(&self, request: &GenerateRequest) -> Result<ValidationReport> {
        let url = self.url("/diagrams/validate");
        debug!("POST {} ({} source)", url, request.diagram_type);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(request)
            .send()
            .await?;
        self.read_envelope(response).await
    }

    async fn fetch_source(&self, url: &str) -> Result<RemoteSource> {
        let endpoint = self.url("/diagrams/load-from-github");
        debug!("POST {} ({})", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", self.bearer())
            .json(&json!({ "url": url }))
            .send()
            .await?;
        self.read_envelope(response).await
    }
}
