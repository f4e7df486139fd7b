//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::UserService;
use crate::infrastructure::crypto::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::{health, metrics, request_id, users};

/// Multipart framing on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Everything the router needs from the composition root.
#[derive(Clone)]
pub struct ApiContext {
    pub user_service: Arc<UserService>,
    pub jwt_config: JwtConfig,
    pub db: DatabaseConnection,
    pub prometheus: PrometheusHandle,
    pub max_image_bytes: usize,
}

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
        users::register,
        users::get_user,
        users::activate_user,
        users::edit_me,
        users::admin_edit_user,
        users::get_image,
    ),
    components(
        schemas(
            ApiResponse<users::UserDto>,
            ApiResponse<users::EditUserResponse>,
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::BalanceDto,
            users::CreateUserRequest,
            users::AuthResponse,
            users::EditUserResponse,
            users::EditUserMultipart,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "Account registration, lookup, activation and profile edits"),
    ),
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "REST API for user accounts, profile images and balances"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };
    let user_state = users::UserHandlerState {
        user_service: ctx.user_service.clone(),
        max_image_bytes: ctx.max_image_bytes,
    };
    let body_limit = DefaultBodyLimit::max(ctx.max_image_bytes + MULTIPART_OVERHEAD_BYTES);

    // Public
    let public_routes = Router::new()
        .route("/users", post(users::register))
        .route("/users/{id}", get(users::get_user))
        .route("/users/images/{filename}", get(users::get_image))
        .with_state(user_state.clone());

    // Any authenticated caller, acting on their own account
    let self_routes = Router::new()
        .route("/users/me", patch(users::edit_me))
        .layer(body_limit)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state.clone());

    // Admin only
    let admin_routes = Router::new()
        .route("/users/{id}/activate", post(users::activate_user))
        .route("/admin/users/{id}", patch(users::admin_edit_user))
        .layer(body_limit)
        .layer(middleware::from_fn_with_state(auth_state, admin_middleware))
        .with_state(user_state);

    let api_routes = public_routes.merge(self_routes).merge(admin_routes);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
