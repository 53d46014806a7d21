//! 거래 로그 기록자.
//!
//! 체결 결과를 append-only 텍스트 파일에 한 줄씩 기록합니다.
//! 각 호출은 파일을 열고, 개행으로 끝나는 레코드 하나를 쓰고, 핸들을
//! 해제합니다. 부분 쓰기 복구는 시도하지 않으며, 전체 append를 다시
//! 시도할지는 호출자의 재량입니다.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use bridge_core::ExecutionResult;

/// 거래 로그 에러.
#[derive(Debug, Error)]
pub enum LogError {
    /// 로그 파일 열기/쓰기 실패
    #[error("Trade log I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 레코드 직렬화 실패
    #[error("Trade log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// append-only 거래 로그.
///
/// 여러 요청이 동시에 기록할 수 있습니다. 레코드 하나는 단일
/// `write_all` 호출로 쓰이며, `O_APPEND` 모드이므로 레코드 간
/// 끼어들기가 발생하지 않습니다.
#[derive(Debug, Clone)]
pub struct TradeLog {
    path: PathBuf,
}

impl TradeLog {
    /// 지정 경로의 거래 로그 생성. 파일은 첫 append 시 만들어집니다.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 로그 파일 경로.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 체결 결과 한 건을 기록합니다.
    ///
    /// 이미 체결된 거래에 대한 기록이므로, 실패는 보고 대상일 뿐
    /// 주문 실행을 되돌리는 사유가 아닙니다.
    ///
    /// # Errors
    /// 파일 열기/쓰기 실패 시 `LogError::Io`를 반환합니다.
    pub fn append(&self, result: &ExecutionResult) -> Result<(), LogError> {
        let mut line = result.to_log_line()?;
        line.push('\n');

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        file.write_all(line.as_bytes()).map_err(|e| LogError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(
            order_id = %result.order_id,
            path = %self.path.display(),
            "Trade logged"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{OrderIntent, OrderOutcome, SymbolAllowList};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_result(order_id: &str) -> ExecutionResult {
        let payload = json!({"ticker": "DOGEUSDT", "side": "buy", "quantity": 10});
        let intent =
            OrderIntent::from_alert(&payload, &SymbolAllowList::single("DOGEUSDT")).unwrap();

        ExecutionResult {
            intent,
            order_id: order_id.to_string(),
            outcome: OrderOutcome::Filled,
            executed_quantity: dec!(10),
            executed_at: Utc::now(),
            raw: json!({"orderId": order_id, "status": "FILLED"}),
        }
    }

    #[test]
    fn test_append_writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = TradeLog::new(dir.path().join("trade_log.txt"));

        log.append(&sample_result("1")).unwrap();
        log.append(&sample_result("2")).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""order_id":"1""#));
        assert!(lines[1].contains(r#""order_id":"2""#));
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_append_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // 디렉터리 자체를 로그 경로로 지정하면 열기가 실패한다
        let log = TradeLog::new(dir.path());

        let err = log.append(&sample_result("1")).unwrap_err();
        assert!(matches!(err, LogError::Io { .. }));
    }

    #[test]
    fn test_concurrent_appends_no_interleaving() {
        let dir = tempfile::tempdir().unwrap();
        let log = TradeLog::new(dir.path().join("trade_log.txt"));

        std::thread::scope(|s| {
            for i in 0..8 {
                let log = log.clone();
                s.spawn(move || {
                    log.append(&sample_result(&i.to_string())).unwrap();
                });
            }
        });

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 8);
        // 모든 줄이 완전한 JSON 레코드여야 한다
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(parsed["order_id"].is_string());
        }
    }
}
