//! HTTP request handlers
//!
//! Implementation of the HTTP endpoints for the session provider server.

use crate::{
    server::app::AppState,
    types::{
        ErrorResponse, GreetingReceipt, GreetingRequest, JobFilters, JobListPage,
        LoginStartResponse, LoginState, PingResponse,
    },
    utils::version,
};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a crate error onto an HTTP status code.
///
/// Missing login is the caller's problem (401), upstream refusals are a
/// bad gateway, everything else is internal.
fn error_status(error: &crate::Error) -> StatusCode {
    match error {
        crate::Error::Login(_) => StatusCode::UNAUTHORIZED,
        crate::Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(error: &crate::Error) -> ApiError {
    (
        error_status(error),
        Json(ErrorResponse::new(error.to_string())),
    )
}

/// Start a fresh QR login attempt
///
/// POST /login/start
///
/// Cancels any in-flight attempt, issues a new QR code and spawns the
/// background watcher.
pub async fn start_login(
    State(state): State<AppState>,
) -> Result<Json<LoginStartResponse>, ApiError> {
    match state.session_manager.start_login().await {
        Ok(login) => {
            let qr_id = login.qr_id.unwrap_or_default();
            let image_url = login.image_url.unwrap_or_default();
            tracing::info!(qr_id = %qr_id, "login attempt started");
            Ok(Json(LoginStartResponse::new(qr_id, image_url)))
        }
        Err(e) => {
            tracing::error!("failed to start login: {}", e);
            Err(api_error(&e))
        }
    }
}

/// Current login state
///
/// GET /login/status
pub async fn login_status(State(state): State<AppState>) -> Json<LoginState> {
    Json(state.session_manager.login_status().await)
}

/// Cancel the in-flight login attempt
///
/// POST /login/cancel
pub async fn cancel_login(State(state): State<AppState>) -> StatusCode {
    let cancelled = state.session_manager.cancel_login().await;
    if !cancelled {
        tracing::debug!("cancel requested with no login attempt running");
    }
    StatusCode::NO_CONTENT
}

/// The current QR image
///
/// GET /login/qrcode
///
/// Serves the PNG fetched during the last `/login/start`.
pub async fn qr_code(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.session_manager.qr_image().await {
        Some(png) => Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response()),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("no QR code available; call /login/start first")),
        )),
    }
}

/// Recommended job listings
///
/// GET /jobs
///
/// Filter labels are passed verbatim (e.g. `experience=不限`); unknown
/// labels are dropped rather than rejected.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<JobListPage>, ApiError> {
    match state.session_manager.list_jobs(&filters).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("failed to fetch job listings: {}", e);
            Err(api_error(&e))
        }
    }
}

/// Send a greeting to the poster of a job
///
/// POST /greet
pub async fn send_greeting(
    State(state): State<AppState>,
    Json(request): Json<GreetingRequest>,
) -> Result<Json<GreetingReceipt>, ApiError> {
    match state
        .session_manager
        .send_greeting(&request.security_id, &request.job_id)
        .await
    {
        Ok(receipt) => Ok(Json(receipt)),
        Err(e) => {
            tracing::error!("failed to send greeting: {}", e);
            Err(api_error(&e))
        }
    }
}

/// Ping endpoint for health checks
///
/// GET /ping
///
/// Returns server status and uptime information.
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(PingResponse::new(uptime, version::get_version()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::session::SessionManager;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let settings = Arc::new(Settings::default());
        AppState {
            session_manager: Arc::new(SessionManager::new(settings).unwrap()),
            start_time: std::time::Instant::now(),
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let response = ping(State(test_state())).await;
        assert_eq!(response.0.version, version::get_version());
    }

    #[tokio::test]
    async fn test_login_status_starts_idle() {
        let response = login_status(State(test_state())).await;
        assert!(!response.0.is_logged_in);
        assert!(response.0.qr_id.is_none());
    }

    #[tokio::test]
    async fn test_cancel_without_attempt() {
        let status = cancel_login(State(test_state())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_qr_code_missing() {
        let result = qr_code(State(test_state())).await;
        let (status, _) = result.err().unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_jobs_require_login() {
        let result = list_jobs(State(test_state()), Query(JobFilters::default())).await;
        let (status, body) = result.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.0.error.contains("Login error"));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&crate::Error::login("no session")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_status(&crate::Error::upstream(37, "rejected")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&crate::Error::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
