//! JSON HTTP API.
//!
//! Tenant routes live under `/api/businesses/{business_id}`; every handler
//! passes that id down so services only ever see one studio's rows. The two
//! admin routes take the business id in the body instead.

pub mod admin;
pub mod attendance;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod packages;
pub mod scheduling;
pub mod students;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::Services;

pub use error::ApiError;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Bearer token required by the admin routes, if any.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Create handler state. Without a token the admin routes are open.
    #[must_use]
    pub fn new(services: Services, admin_token: Option<String>) -> Self {
        Self {
            services,
            admin_token: admin_token.map(Arc::from),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(students::list))
        .route(
            "/students/{student_id}",
            get(students::get).put(students::update),
        )
        .route("/students/{student_id}/packages", get(students::packages))
        .route(
            "/students/{student_id}/packages/usable",
            get(students::usable_packages),
        )
        .route("/students/{student_id}/upcoming", get(students::upcoming))
        .route("/students/{student_id}/check-in", post(students::check_in))
        .route(
            "/students/{student_id}/attendance",
            get(students::attendance),
        )
        .route("/staff", get(students::staff))
        .route(
            "/class-types",
            get(catalog::list_class_types).post(catalog::create_class_type),
        )
        .route(
            "/class-types/{class_type_id}",
            get(catalog::get_class_type)
                .put(catalog::update_class_type)
                .delete(catalog::delete_class_type),
        )
        .route(
            "/class-types/{class_type_id}/active",
            put(catalog::set_class_type_active),
        )
        .route(
            "/package-types",
            get(catalog::list_package_types).post(catalog::create_package_type),
        )
        .route(
            "/package-types/{package_type_id}",
            get(catalog::get_package_type).put(catalog::update_package_type),
        )
        .route(
            "/package-types/{package_type_id}/active",
            put(catalog::set_package_type_active),
        )
        .route("/packages", get(packages::list).post(packages::assign))
        .route("/packages/expire", post(packages::expire))
        .route(
            "/packages/{package_id}",
            get(packages::get).put(packages::edit),
        )
        .route(
            "/schedules",
            get(scheduling::list_schedules).post(scheduling::create_schedule),
        )
        .route(
            "/schedules/{schedule_id}",
            get(scheduling::get_schedule)
                .put(scheduling::update_schedule)
                .delete(scheduling::delete_schedule),
        )
        .route(
            "/schedules/{schedule_id}/active",
            put(scheduling::set_schedule_active),
        )
        .route(
            "/schedules/{schedule_id}/generate",
            post(scheduling::generate),
        )
        .route(
            "/classes",
            get(scheduling::list_classes).post(scheduling::create_class),
        )
        .route(
            "/classes/{class_id}",
            get(scheduling::get_class)
                .put(scheduling::update_class)
                .delete(scheduling::delete_class),
        )
        .route("/classes/{class_id}/cancel", post(scheduling::cancel_class))
        .route(
            "/classes/{class_id}/complete",
            post(scheduling::complete_class),
        )
        .route(
            "/classes/{class_id}/attendance",
            get(attendance::for_class).post(attendance::mark_for_class),
        )
        .route("/attendance", get(attendance::list).post(attendance::mark))
        .route("/attendance/{attendance_id}", delete(attendance::remove))
}

/// Build the API router with request tracing and, optionally, permissive
/// CORS.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/admin/create-student", post(admin::create_student))
        .route("/api/admin/delete-student", delete(admin::delete_student))
        .nest("/api/businesses/{business_id}", tenant_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
