//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, PatientDirectory, UserDirectory};
use crate::domain::{Gender, PatientSort, RepositoryProvider, UserRole};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, MessageDto, PageResponse};
use crate::interfaces::http::middleware::{admin_only, auth_middleware, AuthState};

use super::modules::{auth, health, patients, users};

/// Everything the HTTP layer needs, built once at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub patients: Arc<PatientDirectory>,
    pub users: Arc<UserDirectory>,
    pub auth: Arc<AuthService>,
    pub started_at: Arc<Instant>,
}

impl ApiContext {
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig, password_hash_cost: u32) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        Self {
            patients: Arc::new(PatientDirectory::new(repos.clone())),
            users: Arc::new(UserDirectory::new(repos.clone(), password_hash_cost)),
            auth: Arc::new(AuthService::new(
                repos,
                jwt_config.clone(),
                password_hash_cost,
            )),
            db,
            jwt_config,
            started_at: Arc::new(Instant::now()),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::get_current_user,
        auth::change_password,
        patients::create_patient,
        patients::list_patients,
        patients::get_patient,
        patients::update_patient,
        patients::delete_patient,
        users::create_user,
        users::list_users,
        users::list_all_users,
        users::get_user,
        users::update_user_role,
        users::update_user_status,
        users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<String>,
            MessageDto,
            Gender,
            PatientSort,
            UserRole,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ChangePasswordRequest,
            patients::PatientDto,
            patients::CreatePatientRequest,
            patients::UpdatePatientRequest,
            PageResponse<patients::PatientDto>,
            users::UserProfileDto,
            users::UserSummaryDto,
            users::UserDetailsDto,
            users::RoleChangeDto,
            users::StatusChangeDto,
            users::CreateUserRequest,
            users::UpdateRoleRequest,
            users::UpdateStatusRequest,
            PageResponse<users::UserProfileDto>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database ping"),
        (name = "Authentication", description = "Login (JWT), current user, password change"),
        (name = "Patients", description = "Patient cards: create, search, update, delete"),
        (name = "Users", description = "Staff accounts, admin only"),
    ),
    info(
        title = "Clinic Service API",
        version = "1.0.0",
        description = "REST API for the clinic patient and staff directories",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let middleware_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    let health_state = health::HealthState {
        db: ctx.db.clone(),
        started_at: ctx.started_at.clone(),
    };

    let auth_state = auth::AuthHandlerState {
        auth: ctx.auth.clone(),
        users: ctx.users.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Patient routes (any authenticated staff)
    let patient_routes = Router::new()
        .route(
            "/",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/{id}",
            get(patients::get_patient)
                .patch(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(patients::PatientHandlerState {
            directory: ctx.patients.clone(),
        });

    // User routes (admin only). Layers run bottom-up: auth first.
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/all", get(users::list_all_users))
        .route(
            "/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/{id}/role", patch(users::update_user_role))
        .route("/{id}/status", patch(users::update_user_status))
        .layer(middleware::from_fn(admin_only))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(users::UserHandlerState {
            directory: ctx.users.clone(),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check).with_state(health_state))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1/patients", patient_routes)
        .nest("/api/v1/users", user_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
