//! The uniform response envelope spoken by the diagram endpoints.
//!
//! Every diagram call wraps its payload in `{ success, data?, message?,
//! error? }`; list calls add a `pagination` block beside `data`. The HTTP
//! layer unwraps these into plain `Result` values so nothing above it ever
//! sees the envelope.
use serde::{Deserialize, Serialize};

use crate::{DiaglabError, Result};

/// Generic envelope for single-payload responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Builds a success envelope around `data`.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Builds a failure envelope carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// The most specific failure text the envelope carries.
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "the service reported a failure".to_string())
    }

    /// Unwraps the envelope, turning a reported failure into an `Api` error.
    pub fn into_result(self) -> Result<T> {
        if self.success {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }
        let message = self.failure_message();
        Err(DiaglabError::Api { message })
    }

    /// Like `into_result` but for envelopes whose `data` carries nothing
    /// useful, such as delete confirmations.
    pub fn into_unit_result(self) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let message = self.failure_message();
        Err(DiaglabError::Api { message })
    }
}

/// Page bookkeeping returned alongside list data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Envelope for paginated list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Unwraps the envelope into items plus page bookkeeping. When the
    /// service omits the `pagination` block, the item count stands in.
    pub fn into_result(self, requested_page: u32, requested_limit: u32) -> Result<(Vec<T>, Pagination)> {
        if !self.success {
            let message = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "the service reported a failure".to_string());
            return Err(DiaglabError::Api { message });
        }
        let items = self.data.unwrap_or_default();
        let pagination = self.pagination.unwrap_or(Pagination {
            total: items.len() as u64,
            page: requested_page,
            limit: requested_limit,
        });
        Ok((items, pagination))
    }
}
