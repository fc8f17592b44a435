//! HTTP surface: `GET /api`.

mod error;
mod handler;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use identikit_admission::AdmissionController;
use identikit_generate::UserGenerator;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn UserGenerator>,
    pub admission: Arc<AdmissionController>,
    pub max_results: usize,
    pub trust_forwarded_for: bool,
}

/// Routes expect `ConnectInfo<SocketAddr>`; serve them with
/// `into_make_service_with_connect_info`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handler::get_users))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
