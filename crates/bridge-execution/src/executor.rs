//! 주문 executor 구현.
//!
//! 제공 기능:
//! - 주문 의도의 최종 검증 (양수 수량, 허용 거래쌍)
//! - 거래소 시장가 주문 제출 (재시도 없음)
//! - 거래소 에러의 거부/무응답 분류 유지

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use bridge_core::{ExecutionResult, OrderIntent, OrderOutcome, SymbolAllowList};
use bridge_exchange::{Exchange, ExchangeError};

/// 실행 오류 유형.
///
/// 거부(`ExchangeRejected`)와 무응답(`ExchangeUnavailable`)은 현재
/// 호출자에게 동일한 실패로 보이지만, 운영자 진단을 위해 구분을 유지합니다.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// 거래소가 주문을 명시적으로 거절함
    #[error("Exchange rejected order: {0}")]
    ExchangeRejected(#[source] ExchangeError),

    /// 거래소가 응답하지 않음 (주문 도달 여부 불명)
    #[error("Exchange unavailable: {0}")]
    ExchangeUnavailable(#[source] ExchangeError),

    /// 유효하지 않은 주문 의도 (거래소 호출 전에 차단됨)
    #[error("Invalid order intent: {0}")]
    InvalidIntent(String),
}

impl From<ExchangeError> for ExecutionError {
    fn from(err: ExchangeError) -> Self {
        if err.is_unavailable() {
            ExecutionError::ExchangeUnavailable(err)
        } else {
            ExecutionError::ExchangeRejected(err)
        }
    }
}

/// 주문 실행기.
///
/// 프로세스 시작 시 한 번 생성되어 요청 간 공유됩니다.
pub struct OrderExecutor {
    exchange: Arc<dyn Exchange>,
    allowed: SymbolAllowList,
}

impl OrderExecutor {
    /// 새 실행기 생성.
    pub fn new(exchange: Arc<dyn Exchange>, allowed: SymbolAllowList) -> Self {
        Self { exchange, allowed }
    }

    /// 이 실행기가 따르는 허용 거래쌍 목록.
    pub fn allow_list(&self) -> &SymbolAllowList {
        &self.allowed
    }

    /// 주문 의도를 거래소에 제출합니다.
    ///
    /// 검증이 실패하면 거래소 호출 없이 `InvalidIntent`를 반환합니다.
    /// 시장가 주문은 비멱등이므로 거절 시 재시도하지 않습니다.
    ///
    /// # Errors
    /// - `InvalidIntent`: 수량이 양수가 아니거나 거래쌍이 허용되지 않음
    /// - `ExchangeRejected`: 거래소가 명시적으로 거절
    /// - `ExchangeUnavailable`: 거래소 무응답
    pub async fn execute(&self, intent: OrderIntent) -> Result<ExecutionResult, ExecutionError> {
        self.validate(&intent)?;

        info!(
            intent_id = %intent.id,
            symbol = %intent.symbol,
            side = %intent.side,
            quantity = %intent.quantity,
            "Executing market order"
        );

        let receipt = self
            .exchange
            .place_market_order(&intent.symbol, intent.side, intent.quantity)
            .await
            .map_err(|e| {
                warn!(
                    intent_id = %intent.id,
                    error = %e,
                    unavailable = e.is_unavailable(),
                    "Order execution failed"
                );
                ExecutionError::from(e)
            })?;

        info!(
            intent_id = %intent.id,
            order_id = %receipt.order_id,
            status = %receipt.status,
            "Order executed"
        );

        Ok(ExecutionResult {
            intent,
            order_id: receipt.order_id,
            outcome: OrderOutcome::from_exchange_status(&receipt.status),
            executed_quantity: receipt.executed_quantity,
            executed_at: Utc::now(),
            raw: receipt.raw,
        })
    }

    /// 실행 전 최종 검증.
    ///
    /// 게이트웨이가 이미 검증한 의도라도 실행기 경계에서 다시 확인합니다.
    fn validate(&self, intent: &OrderIntent) -> Result<(), ExecutionError> {
        if intent.quantity <= Decimal::ZERO {
            return Err(ExecutionError::InvalidIntent(format!(
                "quantity must be positive, got {}",
                intent.quantity
            )));
        }

        if !self.allowed.contains(&intent.symbol) {
            return Err(ExecutionError::InvalidIntent(format!(
                "symbol {} is not in the tradable allow-list",
                intent.symbol
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::Side;
    use bridge_exchange::{SimulatedExchange, SimulatedFailure};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn intent(symbol: &str, side: &str, qty: &str) -> OrderIntent {
        let payload = json!({"ticker": symbol, "side": side, "quantity": qty});
        // 검증기는 단일 쌍 기준; executor 쪽 허용 목록과는 별개로 생성
        OrderIntent::from_alert(&payload, &SymbolAllowList::single(symbol)).unwrap()
    }

    fn executor(exchange: Arc<SimulatedExchange>) -> OrderExecutor {
        OrderExecutor::new(exchange, SymbolAllowList::single("DOGEUSDT"))
    }

    #[tokio::test]
    async fn test_buy_executes_exactly_once() {
        let exchange = Arc::new(SimulatedExchange::new());
        let executor = executor(exchange.clone());

        let result = executor
            .execute(intent("DOGEUSDT", "buy", "10"))
            .await
            .unwrap();

        assert_eq!(result.order_id, "1");
        assert_eq!(result.outcome, OrderOutcome::Filled);
        assert_eq!(result.intent.side, Side::Buy);
        assert_eq!(exchange.order_call_count(), 1);
    }

    #[tokio::test]
    async fn test_sell_executes() {
        let exchange = Arc::new(SimulatedExchange::new());
        let executor = executor(exchange.clone());

        let result = executor
            .execute(intent("DOGEUSDT", "sell", "2.5"))
            .await
            .unwrap();

        assert_eq!(result.intent.side, Side::Sell);
        assert_eq!(result.executed_quantity, dec!(2.5));
    }

    #[tokio::test]
    async fn test_disallowed_symbol_makes_no_exchange_call() {
        let exchange = Arc::new(SimulatedExchange::new());
        let executor = executor(exchange.clone());

        let err = executor
            .execute(intent("BTCUSDT", "buy", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::InvalidIntent(_)));
        assert_eq!(exchange.order_call_count(), 0);
    }

    #[tokio::test]
    async fn test_rejection_preserved_no_retry() {
        let exchange = Arc::new(SimulatedExchange::new());
        exchange.fail_next_orders(SimulatedFailure::Rejected("insufficient balance".into()));
        let executor = executor(exchange.clone());

        let err = executor
            .execute(intent("DOGEUSDT", "buy", "10"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::ExchangeRejected(_)));
        // 거절 시 재시도 없음
        assert_eq!(exchange.order_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_preserved() {
        let exchange = Arc::new(SimulatedExchange::new());
        exchange.fail_next_orders(SimulatedFailure::Unavailable("connection refused".into()));
        let executor = executor(exchange.clone());

        let err = executor
            .execute(intent("DOGEUSDT", "sell", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::ExchangeUnavailable(_)));
        assert_eq!(exchange.order_call_count(), 1);
    }
}
