//! User management API handlers
//!
//! Admin-only endpoints. The router puts `admin_only` in front of all of
//! them; handlers delegate to `UserDirectory`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateUserRequest, ListUsersParams, RoleChangeDto, StatusChangeDto, UpdateRoleRequest,
    UpdateStatusRequest, UserDetailsDto, UserProfileDto, UserSummaryDto,
};
use crate::application::UserDirectory;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, MessageDto, PageResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub directory: Arc<UserDirectory>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserProfileDto>),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserProfileDto>>)> {
    let profile = state.directory.create_by_admin(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(profile.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User page, newest first", body = PageResponse<UserProfileDto>),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<PageResponse<UserProfileDto>>> {
    let page = state.directory.list(params.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/all",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every user, oldest first", body = ApiResponse<Vec<UserSummaryDto>>)
    )
)]
pub async fn list_all_users(
    State(state): State<UserHandlerState>,
) -> ApiResult<Json<ApiResponse<Vec<UserSummaryDto>>>> {
    let users = state.directory.find_all().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserSummaryDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDetailsDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDetailsDto>>> {
    let details = state
        .directory
        .get_user(&id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &id))?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<RoleChangeDto>),
        (status = 400, description = "Would remove the last active admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user_role(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<ApiResponse<RoleChangeDto>>> {
    let change = state.directory.update_role(request.role, &id).await?;
    Ok(Json(ApiResponse::success(change.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<StatusChangeDto>),
        (status = 400, description = "User not found")
    )
)]
pub async fn update_user_status(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<StatusChangeDto>>> {
    let change = state
        .directory
        .update_status(&id, request.is_active)
        .await?;
    Ok(Json(ApiResponse::success(change.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<MessageDto>),
        (status = 400, description = "Admin or linked doctor"),
        (status = 403, description = "Own account"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    let confirmation = state.directory.remove(&id, &requester.user_id).await?;
    Ok(Json(ApiResponse::success(confirmation.into())))
}
