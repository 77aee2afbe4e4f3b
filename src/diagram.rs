//! Core diagram data structures for the diaglab application.
//!
//! This module contains the diagram record as the service serializes it,
//! the diagram type enumeration, and the request/response payloads used by
//! the diagram endpoints.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single saved diagram as the service returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    /// Unique identifier for the diagram
    pub id: String,
    /// Diagram title
    pub title: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source language of the diagram
    #[serde(rename = "type")]
    pub diagram_type: DiagramType,
    /// The diagram source code
    pub code: String,
    /// Where the rendered image can be fetched
    #[serde(default)]
    pub image_url: String,
    /// When the diagram was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Owner of the diagram
    pub user_id: String,
}

/// The diagram source languages the service can render.
///
/// Serialized in lowercase on the wire, matching the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    /// AWS architecture diagrams written in Python
    Aws,
    /// Entity-relationship diagrams
    Er,
    /// JSON structure visualizations
    Json,
    /// Mermaid flowcharts and sequences
    Mermaid,
    /// SQL schemas in D2 notation
    Sql,
}

impl DiagramType {
    /// Every supported type, in display order.
    pub const ALL: [DiagramType; 5] = [
        DiagramType::Aws,
        DiagramType::Er,
        DiagramType::Json,
        DiagramType::Mermaid,
        DiagramType::Sql,
    ];

    /// The wire identifier for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Aws => "aws",
            DiagramType::Er => "er",
            DiagramType::Json => "json",
            DiagramType::Mermaid => "mermaid",
            DiagramType::Sql => "sql",
        }
    }

    /// Human-readable name shown in listings.
    pub fn label(&self) -> &'static str {
        match self {
            DiagramType::Aws => "AWS Architecture",
            DiagramType::Er => "Entity Relationship",
            DiagramType::Json => "JSON Structure",
            DiagramType::Mermaid => "Mermaid Chart",
            DiagramType::Sql => "SQL Schema",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(DiagramType::Aws),
            "er" => Ok(DiagramType::Er),
            "json" => Ok(DiagramType::Json),
            "mermaid" => Ok(DiagramType::Mermaid),
            "sql" => Ok(DiagramType::Sql),
            other => Err(format!("unknown diagram type: {other}")),
        }
    }
}

/// Body for creating a diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramCreateRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub diagram_type: DiagramType,
    pub code: String,
}

/// Partial update body; absent fields are left untouched by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagramPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub diagram_type: Option<DiagramType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl DiagramPatch {
    /// True when no field is set, meaning a request would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.diagram_type.is_none()
            && self.code.is_none()
    }
}

/// Body for rendering source without saving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub diagram_type: DiagramType,
}

/// Preview produced by the generate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPreview {
    /// URL of the rendered image
    pub image_url: String,
    /// Present when the service stored a record alongside the render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<Diagram>,
}

/// Options accepted by the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        ExportOptions {
            format,
            quality: None,
            width: None,
            height: None,
        }
    }
}

/// Image formats the export endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
    Pdf,
}

impl ExportFormat {
    /// File extension matching the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Outcome of a validation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Source fetched from an external repository URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSource {
    pub code: String,
    pub filename: String,
}

/// One page of the collection, already unwrapped from the wire envelope.
#[derive(Debug, Clone)]
pub struct DiagramPage {
    pub items: Vec<Diagram>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
