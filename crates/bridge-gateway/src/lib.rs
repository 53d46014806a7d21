//! # Bridge Gateway
//!
//! TradingView 웹훅을 수신해 주문 실행 파이프라인으로 넘기는 HTTP
//! 게이트웨이입니다.
//!
//! 엔드포인트:
//! - `POST /webhook`: 알림 수신 → 검증 → 시장가 주문 → 거래 로그 →
//!   채팅 알림 핸드오프
//! - `GET /health`: 프로세스 생존 확인
//!
//! 응답 계약: 비즈니스 결과는 항상 HTTP 200이며, 본문의 `status` /
//! `error` 키로 성공과 실패를 구분합니다.

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod routes;
pub mod state;

pub use state::AppState;

/// 미들웨어가 적용된 전체 애플리케이션 라우터 생성.
pub fn create_app(state: AppState) -> Router {
    routes::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
}
