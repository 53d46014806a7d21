//! 게이트웨이 공유 상태.

use std::sync::Arc;

use bridge_execution::{OrderExecutor, TradeLog};
use bridge_notification::NotificationDispatcher;

/// 요청 핸들러 간 공유되는 애플리케이션 상태.
///
/// 프로세스 시작 시 한 번 구성되며, 모든 웹훅 요청이 동일한 executor,
/// 거래 로그, 디스패처를 사용합니다.
#[derive(Clone)]
pub struct AppState {
    /// 주문 실행기
    pub executor: Arc<OrderExecutor>,
    /// append-only 거래 로그
    pub trade_log: TradeLog,
    /// 봇 이벤트 루프로의 알림 핸드오프
    pub dispatcher: NotificationDispatcher,
    /// 체결 알림 대상 채팅 ID (미설정 시 알림 생략)
    pub notify_chat_id: Option<i64>,
}

impl AppState {
    /// 새 상태 생성.
    pub fn new(
        executor: Arc<OrderExecutor>,
        trade_log: TradeLog,
        dispatcher: NotificationDispatcher,
        notify_chat_id: Option<i64>,
    ) -> Self {
        Self {
            executor,
            trade_log,
            dispatcher,
            notify_chat_id,
        }
    }
}
