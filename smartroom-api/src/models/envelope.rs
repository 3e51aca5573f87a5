use serde::{Deserialize, Serialize};

/// Wrapper the backend puts around every response payload.
///
/// `status` mirrors the HTTP status code; a 2xx transport response can still
/// carry a non-2xx envelope status, and consumers must check both.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Application-level status code
    pub status: u16,
    /// Human-readable outcome, e.g. "Success" or "Bad credentials"
    pub message: String,
    /// Actual payload; absent on errors and on empty results
    pub data: Option<T>,
    /// Server-side response time, ISO-8601 text
    pub timestamp: String,
}

/// One page of a server-side paginated listing.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    /// Items of the requested page
    pub content: Vec<T>,
    /// Zero-based page index
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total item count across all pages
    pub total_elements: u64,
    /// Total page count
    pub total_pages: u32,
}
