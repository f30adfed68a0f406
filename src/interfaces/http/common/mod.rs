//! Shared HTTP plumbing: response envelope, page wrapper, error mapping

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::{Confirmation, OffsetPage};

/// Standard response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// List endpoints return the page object without the envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse<T> {
    /// Rows matching the filter across all pages
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub items: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: OffsetPage<U>) -> Self
    where
        T: From<U>,
    {
        Self {
            total: page.total,
            offset: page.offset,
            limit: page.limit,
            items: page.items.into_iter().map(T::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

impl From<Confirmation> for MessageDto {
    fn from(c: Confirmation) -> Self {
        Self { message: c.message }
    }
}

/// Domain error carried to the transport.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::BadRequest(_) => StatusCode::BAD_REQUEST,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Storage(_) | DomainError::Crypto(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            DomainError::Storage(detail) => {
                error!(error = %detail, "Request failed on storage");
                "Internal server error".to_string()
            }
            DomainError::Crypto(detail) => {
                error!(error = %detail, "Request failed on password hashing");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::not_found("Patient", "x"), StatusCode::NOT_FOUND),
            (DomainError::Conflict("dup".into()), StatusCode::CONFLICT),
            (DomainError::BadRequest("rule".into()), StatusCode::BAD_REQUEST),
            (DomainError::Forbidden("self".into()), StatusCode::FORBIDDEN),
            (DomainError::Unauthorized("creds".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Storage("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Crypto("bcrypt".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[test]
    fn page_response_converts_items() {
        let page = OffsetPage::new(vec![1u32, 2], 7, 2, 2);
        let resp: PageResponse<u64> = PageResponse::from_page(page);
        assert_eq!(resp.total, 7);
        assert_eq!(resp.items, vec![1u64, 2]);
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "nope");
    }
}
