//! 주문 의도 및 검증.
//!
//! 외부 신호 소스(TradingView 웹훅)에서 들어온 비정형 JSON을
//! 한 번의 검증 단계로 불변 `OrderIntent`로 변환합니다.
//! 부분적으로 유효한 중간 상태는 존재하지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 웹훅 페이로드의 `side` 문자열 파싱 (대소문자 무관).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// 거래 가능 쌍 허용 목록.
///
/// 현재 운영상 단일 쌍이지만 집합으로 확장 가능한 구조입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAllowList {
    symbols: Vec<String>,
}

impl SymbolAllowList {
    /// 단일 거래쌍 허용 목록 생성.
    pub fn single(symbol: impl Into<String>) -> Self {
        Self {
            symbols: vec![symbol.into()],
        }
    }

    /// 여러 거래쌍 허용 목록 생성.
    ///
    /// 빈 목록은 모든 요청을 거부합니다.
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// 허용 여부 확인.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// 대표(첫 번째) 거래쌍. 가격 조회 명령어 등에서 사용합니다.
    pub fn primary(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }

    /// 에러 메시지용 허용 목록 표기.
    pub fn describe(&self) -> String {
        self.symbols.join(", ")
    }
}

/// 검증된 주문 의도.
///
/// `from_alert`를 통해서만 생성되며 생성 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// 내부 추적용 고유 ID
    pub id: Uuid,
    /// 거래쌍 (예: "DOGEUSDT")
    pub symbol: String,
    /// 주문 방향
    pub side: Side,
    /// 주문 수량 (항상 양수)
    pub quantity: Decimal,
    /// 웹훅 수신 시각
    pub received_at: DateTime<Utc>,
}

impl OrderIntent {
    /// 비정형 웹훅 페이로드를 검증하여 주문 의도로 변환합니다.
    ///
    /// 검증 순서:
    /// 1. 본문이 JSON 객체인지
    /// 2. `ticker`, `side`, `quantity` 필드 존재 여부
    /// 3. `ticker`가 허용 목록에 있는지
    /// 4. `side`가 buy/sell인지
    /// 5. `quantity`가 양수인지 (숫자 또는 숫자 문자열 허용)
    ///
    /// # Errors
    /// 검증 실패 시 해당 필드를 명시하는 `ValidationError`를 반환하며,
    /// 이 경우 어떤 거래소 호출도 발생하지 않습니다.
    pub fn from_alert(payload: &Value, allowed: &SymbolAllowList) -> Result<Self, ValidationError> {
        let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let ticker = Self::string_field(obj, "ticker")?;
        let side_raw = Self::string_field(obj, "side")?;
        let quantity_raw = obj
            .get("quantity")
            .ok_or(ValidationError::MissingField("quantity"))?;

        if !allowed.contains(ticker) {
            return Err(ValidationError::DisallowedSymbol {
                symbol: ticker.to_string(),
                allowed: allowed.describe(),
            });
        }

        let side = Side::parse(side_raw)
            .ok_or_else(|| ValidationError::InvalidSide(side_raw.to_string()))?;

        let quantity = Self::parse_quantity(quantity_raw)
            .ok_or_else(|| ValidationError::InvalidQuantity(quantity_raw.to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            symbol: ticker.to_string(),
            side,
            quantity,
            received_at: Utc::now(),
        })
    }

    /// 필수 문자열 필드 조회. 누락과 타입 오류를 구분해 보고합니다.
    fn string_field<'a>(
        obj: &'a serde_json::Map<String, Value>,
        field: &'static str,
    ) -> Result<&'a str, ValidationError> {
        match obj.get(field) {
            None => Err(ValidationError::MissingField(field)),
            Some(value) => value.as_str().ok_or(ValidationError::NotAString(field)),
        }
    }

    /// JSON 숫자 또는 숫자 문자열에서 양수 Decimal 파싱.
    fn parse_quantity(value: &Value) -> Option<Decimal> {
        let quantity: Decimal = match value {
            Value::Number(n) => n.to_string().parse().ok()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };

        (quantity > Decimal::ZERO).then_some(quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn allow_doge() -> SymbolAllowList {
        SymbolAllowList::single("DOGEUSDT")
    }

    #[test]
    fn test_valid_buy_alert() {
        let payload = json!({"ticker": "DOGEUSDT", "side": "buy", "quantity": 10});
        let intent = OrderIntent::from_alert(&payload, &allow_doge()).unwrap();

        assert_eq!(intent.symbol, "DOGEUSDT");
        assert_eq!(intent.side, Side::Buy);
        assert_eq!(intent.quantity, dec!(10));
    }

    #[test]
    fn test_quantity_as_string() {
        let payload = json!({"ticker": "DOGEUSDT", "side": "sell", "quantity": "2.5"});
        let intent = OrderIntent::from_alert(&payload, &allow_doge()).unwrap();

        assert_eq!(intent.side, Side::Sell);
        assert_eq!(intent.quantity, dec!(2.5));
    }

    #[test]
    fn test_missing_fields() {
        let payload = json!({"side": "buy", "quantity": 10});
        assert_eq!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::MissingField("ticker"))
        );

        let payload = json!({"ticker": "DOGEUSDT", "quantity": 10});
        assert_eq!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::MissingField("side"))
        );

        let payload = json!({"ticker": "DOGEUSDT", "side": "buy"});
        assert_eq!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::MissingField("quantity"))
        );
    }

    #[test]
    fn test_wrong_typed_field_named_distinctly() {
        // 필드가 존재하면 "missing"이 아니라 타입 오류로 보고된다
        let payload = json!({"ticker": 5, "side": "buy", "quantity": 10});
        let err = OrderIntent::from_alert(&payload, &allow_doge()).unwrap_err();
        assert_eq!(err, ValidationError::NotAString("ticker"));
        assert_eq!(
            err.to_string(),
            "Invalid JSON format: field 'ticker' must be a string"
        );

        let payload = json!({"ticker": "DOGEUSDT", "side": true, "quantity": 10});
        assert_eq!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::NotAString("side"))
        );
    }

    #[test]
    fn test_disallowed_pair_exact_message() {
        let payload = json!({"ticker": "BTCUSDT", "side": "buy", "quantity": 1});
        let err = OrderIntent::from_alert(&payload, &allow_doge()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Incorrect trading pair, only DOGEUSDT allowed"
        );
    }

    #[test]
    fn test_invalid_side() {
        let payload = json!({"ticker": "DOGEUSDT", "side": "hold", "quantity": 1});
        assert!(matches!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::InvalidSide(_))
        ));
    }

    #[test]
    fn test_non_positive_quantity() {
        for qty in [json!(0), json!(-3), json!("abc"), json!(null)] {
            let payload = json!({"ticker": "DOGEUSDT", "side": "buy", "quantity": qty});
            assert!(
                matches!(
                    OrderIntent::from_alert(&payload, &allow_doge()),
                    Err(ValidationError::InvalidQuantity(_))
                        | Err(ValidationError::MissingField(_))
                ),
                "quantity {qty} should be rejected"
            );
        }
    }

    #[test]
    fn test_not_an_object() {
        let payload = json!([1, 2, 3]);
        assert_eq!(
            OrderIntent::from_alert(&payload, &allow_doge()),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_allow_list_extensible() {
        let allowed =
            SymbolAllowList::new(vec!["DOGEUSDT".to_string(), "SHIBUSDT".to_string()]);

        assert!(allowed.contains("SHIBUSDT"));
        assert!(!allowed.contains("BTCUSDT"));
        assert_eq!(allowed.primary(), Some("DOGEUSDT"));
    }

    #[test]
    fn test_side_parse_case_insensitive() {
        assert_eq!(Side::parse("BUY"), Some(Side::Buy));
        assert_eq!(Side::parse("Sell"), Some(Side::Sell));
        assert_eq!(Side::parse("short"), None);
    }
}
