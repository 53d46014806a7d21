//! 도메인 모델.
//!
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderIntent` - 검증된 주문 의도
//! - `SymbolAllowList` - 거래 가능 쌍 허용 목록
//! - `ExecutionResult` - 거래소 체결 결과

pub mod execution;
pub mod intent;

pub use execution::*;
pub use intent::*;
