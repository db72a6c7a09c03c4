use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/entries/:category/:room/toggle", post(handlers::toggle_form))
        .route("/categories/:category/select-all", post(handlers::select_all_form))
        .route("/categories/:category/deselect-all", post(handlers::deselect_all_form))
        .route("/api/checklist", get(handlers::get_checklist))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/entries/:category/:room/checked", put(handlers::set_checked))
        .route("/api/entries/:category/:room/note", put(handlers::set_note))
        .route("/api/categories/:category/all", put(handlers::set_all))
        .route("/api/reset/status", get(handlers::get_reset_status))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
