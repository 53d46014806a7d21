//! HTTP 라우트 정의.

pub mod health;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// 게이트웨이 라우터 생성.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(webhook::receive_webhook))
        .route("/health", get(health::health_check))
}
