//! 헬스 체크 엔드포인트.

use axum::http::StatusCode;

/// GET /health 핸들러.
///
/// 프로세스 생존 여부만 보고합니다. 거래소 연결 상태는 포함하지 않습니다.
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
