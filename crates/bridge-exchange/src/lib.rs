//! 거래소 연결.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Exchange trait: 가격 조회 및 시장가 주문 인터페이스
//! - Binance Spot 커넥터 (REST, HMAC-SHA256 서명)
//! - 시뮬레이션 거래소 (테스트 및 모의투자용)
//! - 거래소 에러 분류 (거부 vs 무응답)

pub mod connector;
pub mod error;
pub mod simulated;
pub mod traits;

pub use connector::{BinanceClient, BinanceConfig};
pub use error::*;
pub use simulated::{SimulatedExchange, SimulatedFailure};
pub use traits::*;
