//! 컨텍스트 간 알림 핸드오프.
//!
//! 웹훅 핸들러는 자체 스케줄링 컨텍스트(HTTP 워커)에서 실행되고,
//! 채팅 전송은 봇의 단일 이벤트 루프 안에서만 일어나야 합니다.
//! 이 모듈은 그 경계를 넘는 유일한 통로입니다: 생산자는 큐에 넣고
//! 즉시 반환하며, 루프가 제출 순서대로 꺼내 실행합니다.

use tokio::sync::mpsc;
use tracing::error;

use crate::types::NotificationTask;

/// 알림 디스패처 (생산자 측).
///
/// `Clone + Send`이므로 어떤 스레드에서든 호출할 수 있습니다.
/// `dispatch`는 enqueue만 수행하며 await하지 않습니다. 웹훅 응답
/// 지연은 채팅 전송 지연과 무관합니다.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<NotificationTask>,
}

impl NotificationDispatcher {
    /// 디스패처와 봇 루프용 수신 측을 생성합니다.
    ///
    /// 수신 측은 봇 이벤트 루프가 소유해야 하며, 같은 채널의 작업은
    /// 제출 순서(FIFO)대로 처리됩니다.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 알림 작업을 봇 루프로 넘깁니다 (fire-and-forget).
    ///
    /// 전달 성공 여부는 호출자에게 보고되지 않습니다. 알림은 거래
    /// 정합성과 분리된 best-effort 경로입니다. 루프가 이미 종료되어
    /// 채널이 닫힌 경우는 기록만 남깁니다.
    pub fn dispatch(&self, task: NotificationTask) {
        let order_id = task.result.order_id.clone();

        if self.tx.send(task).is_err() {
            error!(
                order_id = %order_id,
                "Notification dropped: bot loop is not running"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{ExecutionResult, OrderIntent, OrderOutcome, SymbolAllowList};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn task(order_id: &str) -> NotificationTask {
        let payload = json!({"ticker": "DOGEUSDT", "side": "buy", "quantity": 10});
        let intent =
            OrderIntent::from_alert(&payload, &SymbolAllowList::single("DOGEUSDT")).unwrap();

        NotificationTask {
            result: ExecutionResult {
                intent,
                order_id: order_id.to_string(),
                outcome: OrderOutcome::Filled,
                executed_quantity: dec!(10),
                executed_at: Utc::now(),
                raw: json!({"orderId": order_id}),
            },
            chat_id: 42,
        }
    }

    #[tokio::test]
    async fn test_fifo_ordering() {
        let (dispatcher, mut rx) = NotificationDispatcher::channel();

        for i in 0..10 {
            dispatcher.dispatch(task(&i.to_string()));
        }

        for i in 0..10 {
            let received = rx.recv().await.unwrap();
            assert_eq!(received.result.order_id, i.to_string());
        }
    }

    #[tokio::test]
    async fn test_dispatch_never_blocks() {
        let (dispatcher, _rx) = NotificationDispatcher::channel();

        // 수신 측이 전혀 소비하지 않아도 enqueue는 즉시 끝나야 한다
        let start = Instant::now();
        for i in 0..1000 {
            dispatcher.dispatch(task(&i.to_string()));
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_closed_channel_swallowed() {
        let (dispatcher, rx) = NotificationDispatcher::channel();
        drop(rx);

        // 패닉 없이 조용히 버려진다
        dispatcher.dispatch(task("1"));
    }

    #[test]
    fn test_dispatch_from_plain_thread() {
        let (dispatcher, mut rx) = NotificationDispatcher::channel();

        // 비동기 런타임 밖의 일반 스레드에서도 안전하게 호출 가능
        let handle = std::thread::spawn(move || {
            dispatcher.dispatch(task("7"));
        });
        handle.join().unwrap();

        let received = rx.blocking_recv().unwrap();
        assert_eq!(received.result.order_id, "7");
    }
}
