use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/panel/:vaccine/update", post(handlers::panel_update))
        .route("/panel/:vaccine/:population/inc", post(handlers::counter_inc))
        .route("/panel/:vaccine/:population/dec", post(handlers::counter_dec))
        .route("/submit/:vaccine", post(handlers::submit))
        .route("/stage/:vaccine", post(handlers::stage))
        .route("/delete/:vaccine/:id", post(handlers::delete))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/counter", post(handlers::api_counter))
        .route("/api/submit/:vaccine", post(handlers::api_submit))
        .route("/api/stage/:vaccine", post(handlers::api_stage))
        .route("/api/submissions/:vaccine/:id", delete(handlers::api_delete))
        .with_state(state)
}
