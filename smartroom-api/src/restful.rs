use serde::{Deserialize, Serialize};

/// Paging parameters for listing endpoints. The client requests a page large
/// enough to capture all results in one call.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

/// Instant range for the average-history endpoints, RFC 3339 text.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRangeQuery {
    pub started_at: String,
    pub ended_at: String,
}
