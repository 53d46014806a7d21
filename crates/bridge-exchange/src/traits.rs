//! 거래소 trait 정의.

use async_trait::async_trait;
use rust_decimal::Decimal;

use bridge_core::Side;

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 시장가 주문 접수 결과.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    /// 거래소 주문 ID
    pub order_id: String,
    /// 거래소 상태 문자열 (예: "FILLED", "NEW")
    pub status: String,
    /// 체결된 수량
    pub executed_quantity: Decimal,
    /// 거래소 원본 응답
    pub raw: serde_json::Value,
}

/// 통합 거래소 인터페이스를 위한 Exchange trait.
///
/// 서명, rate limit 등 거래소 고유 사항은 구현체(collaborator)의 책임이며,
/// 호출자는 이 trait의 계약만 신뢰합니다.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 거래소 이름 반환.
    fn name(&self) -> &str;

    /// 현재 가격 조회.
    async fn get_price(&self, symbol: &str) -> ExchangeResult<Decimal>;

    /// 시장가 주문 제출.
    ///
    /// 정확히 한 번의 외부 주문 호출을 수행합니다. 비멱등 작업이므로
    /// 이 trait 차원의 재시도는 없습니다.
    async fn place_market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
    ) -> ExchangeResult<OrderReceipt>;
}
