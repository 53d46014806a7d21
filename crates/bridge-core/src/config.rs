//! 설정 관리.
//!
//! 모든 설정은 환경 변수에서 로드되며, `.env` 파일은 프로세스 부트스트랩
//! 시점(게이트웨이 main)에 `dotenvy`로 읽습니다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::SymbolAllowList;

/// HTTP 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// - `WEBHOOK_HOST`: 바인딩 호스트 (기본값: "0.0.0.0")
    /// - `WEBHOOK_PORT`: 바인딩 포트 (기본값: 80)
    pub fn from_env() -> Self {
        let host = std::env::var("WEBHOOK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("WEBHOOK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(80);

        Self { host, port }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 거래 정책 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingConfig {
    /// 허용 거래쌍 (쉼표 구분, 첫 항목이 가격 조회 기본 쌍)
    pub allowed_pairs: Vec<String>,
    /// 거래 로그 파일 경로
    pub trade_log_path: PathBuf,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            allowed_pairs: vec!["DOGEUSDT".to_string()],
            trade_log_path: PathBuf::from("trade_log.txt"),
        }
    }
}

impl TradingConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// - `ALLOWED_PAIRS`: 허용 거래쌍 목록, 쉼표 구분 (기본값: "DOGEUSDT")
    /// - `TRADE_LOG_PATH`: 거래 로그 경로 (기본값: "trade_log.txt")
    pub fn from_env() -> Self {
        let allowed_pairs: Vec<String> = std::env::var("ALLOWED_PAIRS")
            .unwrap_or_else(|_| "DOGEUSDT".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let trade_log_path = std::env::var("TRADE_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("trade_log.txt"));

        Self {
            allowed_pairs,
            trade_log_path,
        }
    }

    /// 허용 목록 생성.
    pub fn allow_list(&self) -> SymbolAllowList {
        SymbolAllowList::new(self.allowed_pairs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 80);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_trading_config_default_pair() {
        let config = TradingConfig::default();
        let allow = config.allow_list();

        assert!(allow.contains("DOGEUSDT"));
        assert_eq!(allow.primary(), Some("DOGEUSDT"));
    }
}
