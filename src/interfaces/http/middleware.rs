//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// `None` when the token carries a role this service does not know.
    pub fn from_claims(claims: TokenClaims) -> Option<Self> {
        let role = UserRole::parse(&claims.role)?;
        Some(Self {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer JWT authentication. Inserts `AuthenticatedUser` into the request
/// extensions.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let Some(user) = AuthenticatedUser::from_claims(claims) else {
                return auth_error_response(AuthError::InvalidToken);
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Must run after `auth_middleware`.
pub async fn admin_only(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !user.is_admin() {
        return auth_error_response(AuthError::InsufficientPermissions);
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.email
    }

    fn app() -> Router {
        let state = AuthState {
            jwt_config: JwtConfig::default(),
        };
        let admin = Router::new()
            .route("/admin", get(whoami))
            .layer(middleware::from_fn(admin_only));
        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn token(role: &str) -> String {
        create_token("u-1", "staff@clinic.test", role, &JwtConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn missing_or_garbage_token_is_401() {
        let resp = app().oneshot(request("/me", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app().oneshot(request("/me", Some("garbage"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_identity_through() {
        let resp = app()
            .oneshot(request("/me", Some(&token("doctor"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_role_claim_is_rejected() {
        let resp = app()
            .oneshot(request("/me", Some(&token("janitor"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_refuse_other_roles() {
        let resp = app()
            .oneshot(request("/admin", Some(&token("receptionist"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app()
            .oneshot(request("/admin", Some(&token("admin"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
