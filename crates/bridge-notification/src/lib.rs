//! # Bridge Notification
//!
//! 체결 알림 및 채팅 명령어 처리.
//!
//! 구성 요소:
//! - `NotificationDispatcher`: 웹훅 스레드 → 봇 이벤트 루프 핸드오프
//! - `TelegramApi`: Telegram Bot API 클라이언트 (sendMessage, getChat, getUpdates)
//! - `BotLoop`: 알림 전달과 채팅 명령어(`price`, `!info`)를 처리하는
//!   단일 이벤트 루프
//!
//! 채팅 세션 객체는 봇 루프 컨텍스트에서만 사용되며, 다른 컨텍스트는
//! 디스패처의 핸드오프 채널을 통해서만 루프와 상호작용합니다.

pub mod bot_loop;
pub mod dispatcher;
pub mod telegram;
pub mod types;

pub use bot_loop::*;
pub use dispatcher::*;
pub use telegram::*;
pub use types::*;
