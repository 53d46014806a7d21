//! 웹훅 검증 에러 타입.
//!
//! 외부에서 들어온 비정형 알림 페이로드를 `OrderIntent`로 변환하는 과정에서
//! 발생하는 에러를 정의합니다. 검증 에러는 거래소 호출 전에 발생하므로
//! 어떤 부수 효과도 동반하지 않습니다.

use thiserror::Error;

/// 웹훅 페이로드 검증 에러.
///
/// `Display` 출력이 그대로 웹훅 응답의 `error` 필드가 되므로
/// 메시지 형식 변경 시 호출자 호환성에 주의해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 필수 필드 누락
    #[error("Invalid JSON format: missing field '{0}'")]
    MissingField(&'static str),

    /// 필드는 있으나 타입이 올바르지 않음
    #[error("Invalid JSON format: field '{0}' must be a string")]
    NotAString(&'static str),

    /// 매수/매도 이외의 방향
    #[error("Invalid side '{0}', expected 'buy' or 'sell'")]
    InvalidSide(String),

    /// 수량이 양수가 아니거나 숫자가 아님
    #[error("Invalid quantity '{0}', expected a positive number")]
    InvalidQuantity(String),

    /// 허용 목록에 없는 거래쌍
    #[error("Incorrect trading pair, only {allowed} allowed")]
    DisallowedSymbol {
        /// 요청된 거래쌍
        symbol: String,
        /// 허용 목록 표기 (단일 쌍이면 그 이름)
        allowed: String,
    },

    /// 본문이 JSON 객체가 아님
    #[error("Invalid JSON format")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disallowed_symbol_message() {
        let err = ValidationError::DisallowedSymbol {
            symbol: "BTCUSDT".to_string(),
            allowed: "DOGEUSDT".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Incorrect trading pair, only DOGEUSDT allowed"
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::MissingField("quantity");
        assert_eq!(err.to_string(), "Invalid JSON format: missing field 'quantity'");
    }
}
