use crate::domain::model::{Counts, Listing, TransferReport};
use crate::utils::error::{ErrorCategory, ScoutError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&ScoutError> for ErrorBody {
    fn from(e: &ScoutError) -> Self {
        // upstream failures say what the upstream did; internal ones say nothing more
        let details = match e.category() {
            ErrorCategory::Upstream => Some(e.to_string()),
            _ => None,
        };
        Self {
            error: e.user_friendly_message(),
            details,
        }
    }
}

fn status_of(e: &ScoutError) -> StatusCode {
    StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ScoutError {
    fn into_response(self) -> Response {
        match self.category() {
            ErrorCategory::Input => tracing::debug!("Rejected request: {}", self),
            _ => tracing::error!(
                "❌ Request failed: {} (Category: {:?})",
                self,
                self.category()
            ),
        }
        (status_of(&self), Json(ErrorBody::from(&self))).into_response()
    }
}

/// Body of `GET /api/transfers`.
#[derive(Debug, Serialize)]
pub struct AllTransfersBody {
    pub ok: bool,
    pub source: String,
    pub updated_at: DateTime<Utc>,
    pub counts: Counts,
    pub u21: Vec<Listing>,
    pub nt: Vec<Listing>,
}

impl From<TransferReport> for AllTransfersBody {
    fn from(report: TransferReport) -> Self {
        Self {
            ok: true,
            source: report.source,
            updated_at: report.updated_at,
            counts: report.counts,
            u21: report.u21,
            nt: report.nt,
        }
    }
}

/// Failure body of `GET /api/transfers`.
#[derive(Debug, Serialize)]
pub struct AllTransfersError {
    pub ok: bool,
    pub error: String,
}

pub fn all_transfers_error(e: ScoutError) -> Response {
    tracing::error!(
        "❌ Transfer list fetch failed: {} (Category: {:?})",
        e,
        e.category()
    );
    (
        status_of(&e),
        Json(AllTransfersError {
            ok: false,
            error: e.user_friendly_message(),
        }),
    )
        .into_response()
}
