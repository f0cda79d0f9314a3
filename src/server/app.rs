//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{config::Settings, session::SessionManager};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session manager driving the QR login flow
    pub session_manager: Arc<SessionManager>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

/// Create the main Axum application with routes and middleware
pub fn create_app(settings: Settings) -> crate::Result<Router> {
    let session_manager = Arc::new(SessionManager::new(Arc::new(settings))?);

    let state = AppState {
        session_manager,
        start_time: std::time::Instant::now(),
    };

    Ok(Router::new()
        .route("/login/start", post(super::handlers::start_login))
        .route("/login/status", get(super::handlers::login_status))
        .route("/login/cancel", post(super::handlers::cancel_login))
        .route("/login/qrcode", get(super::handlers::qr_code))
        .route("/jobs", get(super::handlers::list_jobs))
        .route("/greet", post(super::handlers::send_greeting))
        .route("/ping", get(super::handlers::ping))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app() {
        let settings = Settings::default();
        assert!(create_app(settings).is_ok());
    }
}
