//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::application::{AuthService, UserDirectory};
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiResponse, ApiResult, MessageDto, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::users::UserDetailsDto;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDirectory>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        must_change_password: result.must_change_password,
        user: result.user.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDetailsDto>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UserDetailsDto>>> {
    let details = state
        .users
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &user.user_id))?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageDto>),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    state
        .auth
        .change_password(
            &user.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(ApiResponse::success(MessageDto {
        message: "Password changed".to_string(),
    })))
}
