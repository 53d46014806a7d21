//! 텔레그램 채팅 API 클라이언트.
//!
//! Telegram Bot API를 reqwest로 직접 호출합니다. 사용하는 메서드는
//! `sendMessage`, `getChat`, `getUpdates` 세 가지입니다.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, warn};

use bridge_core::{ExecutionResult, Side};

use crate::types::{
    ChatApi, ChatHandle, ChatUpdate, NotificationError, NotificationResult,
};

/// 텔레그램 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 체결 알림을 보낼 채팅 ID
    pub chat_id: i64,
    /// 파싱 모드 (HTML 또는 MarkdownV2)
    pub parse_mode: String,
    /// long polling 타임아웃 (초)
    pub poll_timeout_secs: u64,
    /// API 기본 URL 재정의 (테스트용)
    api_base_override: Option<String>,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: i64) -> Self {
        Self {
            bot_token,
            chat_id,
            parse_mode: "HTML".to_string(),
            poll_timeout_secs: 30,
            api_base_override: None,
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// - `TELEGRAM_BOT_TOKEN`: 봇 토큰
    /// - `TELEGRAM_CHAT_ID`: 대상 채팅 ID (정수)
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?.parse().ok()?;

        Some(Self::new(bot_token, chat_id))
    }

    /// API 기본 URL 재정의 (mock 서버 대상 테스트용).
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base_override = Some(url.into());
        self
    }

    fn method_url(&self, method: &str) -> String {
        match &self.api_base_override {
            Some(base) => format!("{}/bot{}/{}", base, self.bot_token, method),
            None => format!("https://api.telegram.org/bot{}/{}", self.bot_token, method),
        }
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    chat: TelegramChat,
    text: Option<String>,
    from: Option<TelegramUser>,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    is_bot: bool,
}

// ============================================================================
// 클라이언트
// ============================================================================

/// 텔레그램 Bot API 클라이언트.
pub struct TelegramApi {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramApi {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 클라이언트를 생성합니다.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// 설정된 알림 대상 채팅 ID.
    pub fn target_chat_id(&self) -> i64 {
        self.config.chat_id
    }

    /// Bot API 메서드 호출 공통 처리.
    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
        timeout: Option<Duration>,
    ) -> NotificationResult<T> {
        let mut request = self.client.post(self.config.method_url(method)).json(&params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(NotificationError::NetworkError)?;

        if response.status().as_u16() == 429 {
            warn!("Telegram rate limited");
            return Err(NotificationError::RateLimited(60));
        }

        let body: TelegramResponse<T> = response
            .json()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        if body.ok {
            body.result.ok_or_else(|| {
                NotificationError::SendFailed(format!("{}: empty result", method))
            })
        } else {
            Err(NotificationError::SendFailed(format!(
                "{}: {}",
                method,
                body.description.unwrap_or_else(|| "unknown error".to_string())
            )))
        }
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn resolve_chat(&self, chat_id: i64) -> NotificationResult<ChatHandle> {
        let params = serde_json::json!({ "chat_id": chat_id });

        let chat: TelegramChat = self
            .call("getChat", params, None)
            .await
            .map_err(|e| {
                debug!(chat_id = chat_id, error = %e, "getChat failed");
                NotificationError::ChannelNotFound(chat_id)
            })?;

        Ok(ChatHandle {
            id: chat.id,
            title: chat.title,
        })
    }

    async fn send_text(&self, chat: &ChatHandle, text: &str) -> NotificationResult<()> {
        let params = serde_json::json!({
            "chat_id": chat.id,
            "text": text,
            "parse_mode": self.config.parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(chat_id = chat.id, "Sending Telegram message");

        // sendMessage의 result는 Message 객체이나 내용은 사용하지 않음
        let _: serde_json::Value = self.call("sendMessage", params, None).await.map_err(|e| {
            error!(chat_id = chat.id, error = %e, "Failed to send Telegram message");
            e
        })?;

        Ok(())
    }

    async fn poll_updates(&self, offset: i64) -> NotificationResult<Vec<ChatUpdate>> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": self.config.poll_timeout_secs,
            "allowed_updates": ["message"],
        });

        // long poll이므로 요청 타임아웃은 폴링 타임아웃보다 넉넉하게
        let timeout = Duration::from_secs(self.config.poll_timeout_secs + 5);
        let updates: Vec<TelegramUpdate> = self.call("getUpdates", params, Some(timeout)).await?;

        Ok(updates
            .into_iter()
            .filter_map(|u| {
                let message = u.message?;
                Some(ChatUpdate {
                    update_id: u.update_id,
                    chat_id: message.chat.id,
                    text: message.text,
                    from_bot: message.from.map(|f| f.is_bot).unwrap_or(false),
                })
            })
            .collect())
    }
}

/// 체결 결과를 텔레그램 메시지(HTML)로 포맷합니다.
pub fn format_trade_message(result: &ExecutionResult) -> String {
    let side_emoji = match result.intent.side {
        Side::Buy => "🟢",
        Side::Sell => "🔴",
    };

    let timestamp = result.executed_at.format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        "{side_emoji} <b>주문 체결</b>\n\n\
         심볼: <code>{symbol}</code>\n\
         방향: {side}\n\
         수량: {quantity}\n\
         주문ID: <code>{order_id}</code>\n\n\
         <i>🕐 {timestamp}</i>",
        symbol = result.intent.symbol,
        side = result.intent.side,
        quantity = result.intent.quantity,
        order_id = result.order_id,
    )
}
