//! Patient API handlers
//!
//! Thin wrappers over `PatientDirectory`. Any authenticated staff member may
//! use them.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreatePatientRequest, ListPatientsParams, PatientDto, UpdatePatientRequest};
use crate::application::PatientDirectory;
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, MessageDto, PageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct PatientHandlerState {
    pub directory: Arc<PatientDirectory>,
}

#[utoipa::path(
    post,
    path = "/api/v1/patients",
    tag = "Patients",
    security(("bearer_auth" = [])),
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = ApiResponse<PatientDto>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_patient(
    State(state): State<PatientHandlerState>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PatientDto>>)> {
    let patient = state.directory.create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(patient.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(ListPatientsParams),
    responses(
        (status = 200, description = "Patient page", body = PageResponse<PatientDto>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_patients(
    State(state): State<PatientHandlerState>,
    Query(params): Query<ListPatientsParams>,
) -> ApiResult<Json<PageResponse<PatientDto>>> {
    let page = state.directory.list(params.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient", body = ApiResponse<PatientDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_patient(
    State(state): State<PatientHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PatientDto>>> {
    let patient = state.directory.get_one(&id).await?;
    Ok(Json(ApiResponse::success(patient.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = ApiResponse<PatientDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_patient(
    State(state): State<PatientHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> ApiResult<Json<ApiResponse<PatientDto>>> {
    let patient = state.directory.update(&id, request.into()).await?;
    Ok(Json(ApiResponse::success(patient.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient deleted", body = ApiResponse<MessageDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_patient(
    State(state): State<PatientHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageDto>>> {
    let confirmation = state.directory.remove(&id).await?;
    Ok(Json(ApiResponse::success(confirmation.into())))
}
