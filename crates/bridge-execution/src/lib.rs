//! 주문 실행 및 거래 로그.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - OrderExecutor: 검증된 주문 의도를 거래소에 제출
//! - TradeLog: 체결 결과의 append-only 기록

pub mod executor;
pub mod trade_log;

pub use executor::{ExecutionError, OrderExecutor};
pub use trade_log::{LogError, TradeLog};
