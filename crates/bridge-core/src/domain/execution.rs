//! 체결 결과 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::intent::OrderIntent;

/// 거래소가 보고한 주문 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOutcome {
    /// 전량 체결됨
    Filled,
    /// 접수됨 (시장가 주문이 즉시 체결 보고되지 않은 경우)
    Accepted,
}

impl OrderOutcome {
    /// 거래소 상태 문자열에서 변환.
    ///
    /// 시장가 주문은 보통 `FILLED`로 응답하지만, 일부 응답 타입에서는
    /// `NEW`로 접수만 보고될 수 있습니다.
    pub fn from_exchange_status(status: &str) -> Self {
        match status {
            "FILLED" | "PARTIALLY_FILLED" => OrderOutcome::Filled,
            _ => OrderOutcome::Accepted,
        }
    }
}

/// 수락된 주문 의도 하나당 정확히 한 번 생성되는 체결 결과.
///
/// 생성 이후 변경되지 않으며, 소유권은 웹훅 게이트웨이가 가집니다
/// (로그 기록 → 알림 핸드오프 순서로 소비).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// 원본 주문 의도
    pub intent: OrderIntent,
    /// 거래소 주문 ID
    pub order_id: String,
    /// 주문 결과 상태
    pub outcome: OrderOutcome,
    /// 체결 수량 (거래소 보고값)
    pub executed_quantity: Decimal,
    /// 체결 시각
    pub executed_at: DateTime<Utc>,
    /// 거래소 원본 응답 (웹훅 응답에 그대로 포함)
    pub raw: serde_json::Value,
}

impl ExecutionResult {
    /// 거래 로그에 기록할 한 줄짜리 JSON 레코드.
    ///
    /// 개행 없이 직렬화됩니다. 줄바꿈 추가는 로그 기록자의 몫입니다.
    pub fn to_log_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
