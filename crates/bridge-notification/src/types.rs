//! 알림 타입 및 trait 정의.

use async_trait::async_trait;

use bridge_core::ExecutionResult;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
///
/// 어떤 변형도 프로세스 치명적이지 않습니다. 봇 루프는 모든 알림
/// 에러를 기록하고 계속 동작합니다.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("채널을 찾을 수 없음: {0}")]
    ChannelNotFound(i64),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 봇 루프로 넘겨지는 알림 작업 단위.
///
/// 핸드오프 시점에 소유권이 이전되며, 웹훅 게이트웨이는 이후 이 값을
/// 보지 않습니다.
#[derive(Debug)]
pub struct NotificationTask {
    /// 알릴 체결 결과
    pub result: ExecutionResult,
    /// 대상 채팅 ID
    pub chat_id: i64,
}

/// 해석된 채팅 채널 핸들.
///
/// 알림마다 `resolve_chat`으로 새로 조회하며 캐시하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatHandle {
    /// 채팅 ID
    pub id: i64,
    /// 채팅 제목 (그룹/채널인 경우)
    pub title: Option<String>,
}

impl ChatHandle {
    /// ID만으로 핸들 생성 (명령어 응답용).
    pub fn direct(id: i64) -> Self {
        Self { id, title: None }
    }
}

/// 수신한 채팅 업데이트.
#[derive(Debug, Clone)]
pub struct ChatUpdate {
    /// 업데이트 ID (offset 추적용)
    pub update_id: i64,
    /// 메시지가 수신된 채팅 ID
    pub chat_id: i64,
    /// 메시지 본문
    pub text: Option<String>,
    /// 봇이 보낸 메시지 여부
    pub from_bot: bool,
}

/// 채팅 플랫폼 API 경계.
///
/// 봇 루프가 필요로 하는 채팅 협력자 기능의 최소 집합입니다.
/// 세션 수명주기와 인증은 구현체의 책임입니다.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// 채팅 ID를 핸들로 해석합니다.
    ///
    /// # Errors
    /// 채팅이 존재하지 않거나 접근 불가하면 `ChannelNotFound`를 반환합니다.
    /// 이는 복구 가능한 상태이며, 호출자는 기록 후 해당 알림을 버립니다.
    async fn resolve_chat(&self, chat_id: i64) -> NotificationResult<ChatHandle>;

    /// 채팅으로 텍스트 메시지를 전송합니다.
    async fn send_text(&self, chat: &ChatHandle, text: &str) -> NotificationResult<()>;

    /// 새 업데이트를 폴링합니다 (long polling).
    ///
    /// `offset`보다 크거나 같은 update_id의 업데이트를 반환합니다.
    async fn poll_updates(&self, offset: i64) -> NotificationResult<Vec<ChatUpdate>>;
}
