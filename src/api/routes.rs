use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{StateResponse, SummarizeRequest, SummarizeResponse};
use crate::api::response::{self, Reply};
use crate::session::Session;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/state", get(state_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = lock_session(&state.session);
    response::success(StateResponse::from_session(&session))
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Reply<SummarizeResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        let err = AppError::ParseError(rejection.body_text());
        warn!(error = %err, "rejected summarize request");
        err
    })?;

    let url = {
        let mut session = lock_session(&state.session);
        session.set_url(req.url);
        session.begin()
    }
    .inspect_err(|err| warn!(error = %err, "summarize request refused"))?;

    info!(url = %url, "processing summarize request");
    let start = Instant::now();

    // The chain runs detached so a dropped connection cannot leave the
    // session stuck in `Loading`.
    let guard = SettleGuard::new(state.session.clone());
    let summariser = state.summariser.clone();
    let task = tokio::spawn(async move {
        let result = summariser.summarize_url(&url).await;
        guard.settle(result)
    });

    let body = match task.await {
        Ok(body) => body,
        Err(join_err) => {
            warn!(error = %join_err, "summarize task aborted");
            SummarizeResponse::from_session(&lock_session(&state.session))
        }
    };

    info!(status = %body.status, elapsed = ?start.elapsed(), "summarize request finished");
    Ok(response::success(body))
}

fn lock_session(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles the shared session exactly once: explicitly with the chain's
/// result, or as a failure if dropped first.
struct SettleGuard {
    session: Arc<Mutex<Session>>,
    settled: bool,
}

impl SettleGuard {
    fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session, settled: false }
    }

    fn settle(mut self, result: Result<String>) -> SummarizeResponse {
        let body = {
            let mut session = lock_session(&self.session);
            session.settle(result);
            SummarizeResponse::from_session(&session)
        };
        self.settled = true;
        body
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut session = lock_session(&self.session);
        if session.is_loading() {
            session.settle(Err(AppError::FetchError("summarize task did not complete".to_string())));
        }
    }
}
