//! `Json<T>` plus `validator::Validate`
//!
//! Malformed bodies are rejected with 400, bodies that parse but fail
//! validation with 422. Both use the `ApiResponse` error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreatePatientRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` pairs, sorted, joined with `; `.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    for (field, errs) in errors.field_errors() {
        for e in errs {
            let msg = match &e.message {
                Some(m) => m.to_string(),
                None => e.code.to_string(),
            };
            parts.push(format!("{}: {}", field, msg));
        }
    }
    if parts.is_empty() {
        return "Validation failed".to_string();
    }
    parts.sort();
    parts.join("; ")
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", rejection))
            }
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        body.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Contact {
        #[validate(length(min = 1, max = 100, message = "name is required"))]
        name: String,
        #[validate(email(message = "invalid email"))]
        email: String,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<Contact>) -> String {
        body.name
    }

    fn app() -> Router {
        Router::new().route("/test", post(handler))
    }

    fn json_request(body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let body = serde_json::json!({"name": "Aziza", "email": "aziza@mail.test"});
        let resp = send(json_request(Body::from(body.to_string()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn describe_without_field_errors() {
        assert_eq!(describe(&ValidationErrors::new()), "Validation failed");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = send(json_request(Body::from("{\"name\": "))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_fields_are_422_with_messages() {
        let body = serde_json::json!({"name": "", "email": "not-an-email"});
        let resp = send(json_request(Body::from(body.to_string()))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "email: invalid email; name: name is required");
    }
}
