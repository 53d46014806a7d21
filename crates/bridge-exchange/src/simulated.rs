//! 시뮬레이션 거래소.
//!
//! 실제 네트워크 없이 `Exchange` 계약을 구현합니다. 테스트의 협력자
//! 스텁으로 사용되며, 모의투자 백엔드로도 쓸 수 있습니다.
//! 주문 호출 횟수를 기록하므로 "검증 실패 시 거래소 호출 없음" 같은
//! 속성을 검증할 수 있습니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use bridge_core::Side;

use crate::traits::{Exchange, ExchangeResult, OrderReceipt};
use crate::ExchangeError;

/// 스크립트된 실패 모드.
#[derive(Debug, Clone)]
pub enum SimulatedFailure {
    /// 거래소가 명시적으로 거절 (예: 잔고 부족)
    Rejected(String),
    /// 거래소 무응답 (네트워크 장애)
    Unavailable(String),
}

/// 시뮬레이션 거래소.
pub struct SimulatedExchange {
    prices: Mutex<HashMap<String, Decimal>>,
    failure: Mutex<Option<SimulatedFailure>>,
    next_order_id: AtomicU64,
    order_calls: AtomicUsize,
    price_calls: AtomicUsize,
    /// 주문 처리에 걸리는 인위적 지연 (지연 검증 테스트용)
    latency: Option<Duration>,
}

impl SimulatedExchange {
    /// 빈 가격 테이블로 생성.
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            next_order_id: AtomicU64::new(1),
            order_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// 심볼 가격 등록.
    pub fn with_price(self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.lock().unwrap().insert(symbol.into(), price);
        self
    }

    /// 인위적 지연 설정.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 다음 주문 호출부터 실패하도록 설정.
    pub fn fail_next_orders(&self, failure: SimulatedFailure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    /// 지금까지의 주문 호출 횟수.
    pub fn order_call_count(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    /// 지금까지의 가격 조회 횟수.
    pub fn price_call_count(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    fn scripted_failure(&self) -> Option<ExchangeError> {
        self.failure.lock().unwrap().as_ref().map(|f| match f {
            SimulatedFailure::Rejected(msg) => ExchangeError::OrderRejected(msg.clone()),
            SimulatedFailure::Unavailable(msg) => ExchangeError::NetworkError(msg.clone()),
        })
    }
}

impl Default for SimulatedExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Exchange for SimulatedExchange {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<Decimal> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);

        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| ExchangeError::ApiError {
                code: -1121,
                message: format!("Invalid symbol: {}", symbol),
            })
    }

    async fn place_market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
    ) -> ExchangeResult<OrderReceipt> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(err) = self.scripted_failure() {
            return Err(err);
        }

        let order_id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        debug!(%symbol, %side, %quantity, order_id, "Simulated order filled");

        let raw = serde_json::json!({
            "symbol": symbol,
            "orderId": order_id.to_string(),
            "status": "FILLED",
            "side": side.to_string(),
            "executedQty": quantity.to_string(),
        });

        Ok(OrderReceipt {
            order_id: order_id.to_string(),
            status: "FILLED".to_string(),
            executed_quantity: quantity,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_fill_and_counting() {
        let exchange = SimulatedExchange::new().with_price("DOGEUSDT", dec!(0.25));

        let receipt = exchange
            .place_market_order("DOGEUSDT", Side::Buy, dec!(10))
            .await
            .unwrap();

        assert_eq!(receipt.order_id, "1");
        assert_eq!(receipt.status, "FILLED");
        assert_eq!(exchange.order_call_count(), 1);
        assert_eq!(exchange.get_price("DOGEUSDT").await.unwrap(), dec!(0.25));
    }

    #[tokio::test]
    async fn test_scripted_rejection() {
        let exchange = SimulatedExchange::new();
        exchange.fail_next_orders(SimulatedFailure::Rejected("insufficient balance".into()));

        let err = exchange
            .place_market_order("DOGEUSDT", Side::Sell, dec!(1))
            .await
            .unwrap_err();

        assert!(!err.is_unavailable());
        assert_eq!(exchange.order_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_price() {
        let exchange = SimulatedExchange::new();
        assert!(exchange.get_price("BTCUSDT").await.is_err());
    }
}
