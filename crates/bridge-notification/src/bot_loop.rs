//! 알림 봇 이벤트 루프.
//!
//! 단일 태스크가 두 입력원을 소비합니다:
//! - 웹훅 게이트웨이에서 넘어온 체결 알림 (채널, FIFO)
//! - 채팅 사용자의 명령어 (long polling)
//!
//! 알림 전송 실패는 기록 후 버려지며 루프를 멈추지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bridge_exchange::Exchange;

use crate::telegram::format_trade_message;
use crate::types::{ChatApi, ChatHandle, ChatUpdate, NotificationTask};

/// 폴링 실패 후 재시도 대기 시간.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// 채팅에서 인식하는 명령어.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// 기본 심볼의 현재가 조회
    Price,
    /// 봇 소개 및 사용법 안내
    Info,
}

impl ChatCommand {
    /// 메시지 본문에서 명령어를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않으며, 명령어가 아닌 메시지는 `None`입니다.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "price" => Some(Self::Price),
            "!info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// 알림 봇 루프.
///
/// `run`이 반환될 때까지 채널 수신과 업데이트 폴링을 반복합니다.
/// 채널의 알림이 폴링보다 항상 우선합니다.
pub struct BotLoop {
    rx: mpsc::UnboundedReceiver<NotificationTask>,
    chat: Arc<dyn ChatApi>,
    exchange: Arc<dyn Exchange>,
    /// 명령어 응답에 사용할 기본 심볼
    default_symbol: String,
    /// 마지막으로 처리한 update_id
    last_update_id: i64,
    /// 폴링 실패 후 다음 폴링을 허용하는 시각
    poll_backoff_until: Option<tokio::time::Instant>,
}

impl BotLoop {
    /// 새 봇 루프를 생성합니다.
    pub fn new(
        rx: mpsc::UnboundedReceiver<NotificationTask>,
        chat: Arc<dyn ChatApi>,
        exchange: Arc<dyn Exchange>,
        default_symbol: impl Into<String>,
    ) -> Self {
        Self {
            rx,
            chat,
            exchange,
            default_symbol: default_symbol.into(),
            last_update_id: 0,
            poll_backoff_until: None,
        }
    }

    /// 루프를 실행합니다. 취소 토큰이 취소되거나 채널이 닫히면 반환합니다.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(symbol = %self.default_symbol, "Notification bot loop started");

        loop {
            // poll_updates는 취소 안전: offset은 업데이트 처리 후에만 전진
            let chat = Arc::clone(&self.chat);
            let offset = self.last_update_id + 1;
            let backoff_until = self.poll_backoff_until;

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Notification bot loop shutting down");
                    break;
                }

                task = self.rx.recv() => {
                    match task {
                        Some(task) => self.deliver(task).await,
                        None => {
                            info!("Notification channel closed, stopping bot loop");
                            break;
                        }
                    }
                }

                // 폴링 재시도 대기는 이 branch의 future 안에서만 일어나므로
                // 대기 중에도 알림 채널은 계속 소비된다
                polled = async {
                    if let Some(until) = backoff_until {
                        tokio::time::sleep_until(until).await;
                    }
                    chat.poll_updates(offset).await
                } => {
                    match polled {
                        Ok(updates) => {
                            self.poll_backoff_until = None;
                            for update in updates {
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to poll chat updates");
                            self.poll_backoff_until =
                                Some(tokio::time::Instant::now() + POLL_RETRY_DELAY);
                        }
                    }
                }
            }
        }
    }

    /// 체결 알림 한 건을 전송합니다. 모든 실패는 기록 후 무시합니다.
    async fn deliver(&self, task: NotificationTask) {
        let handle = match self.chat.resolve_chat(task.chat_id).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    chat_id = task.chat_id,
                    order_id = %task.result.order_id,
                    error = %e,
                    "Dropping trade notification: chat unavailable"
                );
                return;
            }
        };

        let message = format_trade_message(&task.result);

        match self.chat.send_text(&handle, &message).await {
            Ok(()) => {
                debug!(
                    chat_id = task.chat_id,
                    order_id = %task.result.order_id,
                    "Trade notification sent"
                );
            }
            Err(e) => {
                warn!(
                    chat_id = task.chat_id,
                    order_id = %task.result.order_id,
                    error = %e,
                    "Failed to send trade notification"
                );
            }
        }
    }

    /// 수신한 채팅 업데이트 한 건을 처리합니다.
    async fn handle_update(&mut self, update: ChatUpdate) {
        // offset은 명령어 처리 성공 여부와 무관하게 전진
        self.last_update_id = self.last_update_id.max(update.update_id);

        if update.from_bot {
            return;
        }

        let Some(command) = update.text.as_deref().and_then(ChatCommand::parse) else {
            return;
        };

        debug!(chat_id = update.chat_id, command = ?command, "Chat command received");

        let reply = match command {
            ChatCommand::Price => self.price_reply().await,
            ChatCommand::Info => self.info_reply(),
        };

        let handle = ChatHandle::direct(update.chat_id);
        if let Err(e) = self.chat.send_text(&handle, &reply).await {
            warn!(chat_id = update.chat_id, error = %e, "Failed to send command reply");
        }
    }

    async fn price_reply(&self) -> String {
        match self.exchange.get_price(&self.default_symbol).await {
            Ok(price) => format!(
                "💰 <code>{}</code> 현재가: <code>{}</code>",
                self.default_symbol, price
            ),
            Err(e) => format!("⚠️ 가격 조회 실패: {}", e),
        }
    }

    fn info_reply(&self) -> String {
        format!(
            "🤖 {} 트레이딩 봇입니다. 'price'를 보내면 {} 현재가를 알려드립니다.",
            self.exchange.name(),
            self.default_symbol
        )
    }
}
