use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::PageRequest;

/// Health response payload.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: String,
    pub authenticated: bool,
    pub user_id: Option<i64>,
}

/// Offset pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl From<PageQuery> for PageRequest {
    fn from(value: PageQuery) -> Self {
        let defaults = PageRequest::default();
        PageRequest::new(
            value.offset.unwrap_or(defaults.offset()),
            value.limit.unwrap_or(defaults.limit()),
        )
    }
}
