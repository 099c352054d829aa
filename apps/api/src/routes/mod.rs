pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(analysis::handle_list_models))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/clear",
            post(session::handle_clear_session),
        )
        .route(
            "/api/v1/sessions/:id/api-key",
            put(session::handle_set_api_key),
        )
        .route(
            "/api/v1/sessions/:id/api-key/test",
            post(session::handle_test_api_key),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(session::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(session::handle_upload_resume).layer(upload_limit),
        )
        .route("/api/v1/sessions/:id/demo", post(session::handle_load_demo))
        // Analysis
        .route(
            "/api/v1/sessions/:id/analyze",
            post(analysis::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/current",
            get(analysis::handle_get_current).delete(analysis::handle_clear_current),
        )
        .route(
            "/api/v1/sessions/:id/current/dashboard",
            get(analysis::handle_current_dashboard),
        )
        .route(
            "/api/v1/sessions/:id/current/report",
            get(analysis::handle_current_report),
        )
        // History
        .route(
            "/api/v1/sessions/:id/history",
            get(analysis::handle_list_history),
        )
        .route(
            "/api/v1/sessions/:id/history/stats",
            get(analysis::handle_history_stats),
        )
        .route(
            "/api/v1/sessions/:id/history/:analysis_id/load",
            post(analysis::handle_load_analysis),
        )
        .route(
            "/api/v1/sessions/:id/history/:analysis_id",
            delete(analysis::handle_delete_analysis),
        )
        .with_state(state)
}
