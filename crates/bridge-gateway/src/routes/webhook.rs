//! TradingView 웹훅 수신 엔드포인트.
//!
//! 모든 비즈니스 결과(성공, 검증 실패, 거래소 거부)는 HTTP 200으로
//! 응답하며, 결과는 JSON 본문의 키(`status` 또는 `error`)로 구분합니다.
//! 기존 웹훅 발신자와의 호환을 위한 계약입니다.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use bridge_core::OrderIntent;
use bridge_notification::NotificationTask;

use crate::state::AppState;

/// 에러 응답 본문 생성.
fn error_body(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "error": message.into() }))
}

/// POST /webhook 핸들러.
///
/// 처리 순서: JSON 파싱 → 의도 검증 → 주문 실행 → 거래 로그 기록 →
/// 알림 핸드오프 → 응답. 로그 기록 실패와 알림은 응답에 영향을 주지
/// 않습니다.
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    // 바디를 직접 파싱해 잘못된 JSON도 200 + error 본문으로 처리
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Webhook body is not valid JSON");
            return error_body("Invalid JSON format");
        }
    };

    let intent = match OrderIntent::from_alert(&payload, state.executor.allow_list()) {
        Ok(intent) => intent,
        Err(e) => {
            warn!(error = %e, "Webhook alert rejected");
            return error_body(e.to_string());
        }
    };

    info!(
        intent_id = %intent.id,
        symbol = %intent.symbol,
        side = %intent.side,
        quantity = %intent.quantity,
        "Webhook alert accepted"
    );

    let result = match state.executor.execute(intent).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Order execution failed");
            return error_body(e.to_string());
        }
    };

    // 로그 기록 실패는 기록만 하고 응답은 그대로 성공
    if let Err(e) = state.trade_log.append(&result) {
        error!(
            order_id = %result.order_id,
            error = %e,
            "Failed to append trade log entry"
        );
    }

    if let Some(chat_id) = state.notify_chat_id {
        state.dispatcher.dispatch(NotificationTask {
            result: result.clone(),
            chat_id,
        });
    }

    Json(json!({
        "status": "order executed",
        "order": result.raw,
    }))
}
