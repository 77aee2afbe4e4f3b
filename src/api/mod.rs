//! HTTP wrappers over the remote auth and diagram endpoints.
mod auth;
mod diagrams;

pub use auth::AuthApi;
pub use diagrams::DiagramApi;

use async_trait::async_trait;

use crate::{
    Diagram, DiagramCreateRequest, DiagramPage, DiagramPatch, ExportOptions, GenerateRequest,
    GeneratedPreview, RemoteSource, Result, ValidationReport,
};

/// The remote operations the collection manager depends on.
///
/// The production implementation is [`DiagramApi`]; tests substitute their
/// own to script outcomes without a network.
#[async_trait]
pub trait DiagramBackend: Send + Sync {
    /// One page of the signed-in user's diagrams.
    async fn list(&self, page: u32, limit: u32) -> Result<DiagramPage>;

    /// A single diagram by id.
    async fn get(&self, id: &str) -> Result<Diagram>;

    /// Renders source into an image without persisting anything.
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedPreview>;

    /// Persists a new diagram.
    async fn create(&self, request: &DiagramCreateRequest) -> Result<Diagram>;

    /// Applies a partial update, returning the updated record.
    async fn update(&self, id: &str, patch: &DiagramPatch) -> Result<Diagram>;

    /// Deletes a diagram. Success means the server confirmed the delete.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Downloads a rendered image in the requested format.
    async fn export(&self, id: &str, options: &ExportOptions) -> Result<Vec<u8>>;

    /// Checks source for errors without rendering.
    async fn validate(&self, request: &GenerateRequest) -> Result<ValidationReport>;

    /// Fetches diagram source from a public repository URL.
    async fn fetch_source(&self, url: &str) -> Result<RemoteSource>;
}
