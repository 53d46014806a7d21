//! 웹훅 게이트웨이 서버.
//!
//! TradingView 알림을 수신해 Binance 시장가 주문으로 실행하고,
//! 체결 내역을 거래 로그와 텔레그램으로 전달합니다.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use bridge_core::{init_logging_from_env, ServerConfig, TradingConfig};
use bridge_exchange::{BinanceClient, Exchange};
use bridge_execution::{OrderExecutor, TradeLog};
use bridge_gateway::{create_app, AppState};
use bridge_notification::{BotLoop, NotificationDispatcher, TelegramApi, TelegramConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging_from_env()?;

    info!("Starting webhook gateway...");

    let server_config = ServerConfig::from_env();
    let trading_config = TradingConfig::from_env();
    let allow_list = trading_config.allow_list();

    let addr = server_config.socket_addr().map_err(|e| {
        error!(
            host = %server_config.host,
            port = server_config.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. WEBHOOK_HOST, WEBHOOK_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // Binance 클라이언트 생성 및 연결 확인
    let exchange: Arc<dyn Exchange> = match BinanceClient::from_env() {
        Some(client) => {
            if let Err(e) = client.ping().await {
                warn!(error = %e, "Binance connectivity check failed, continuing anyway");
            }
            Arc::new(client)
        }
        None => {
            error!("Binance API not configured. Set BINANCE_API_KEY, BINANCE_API_SECRET.");
            return Err("missing Binance credentials".into());
        }
    };

    let executor = Arc::new(OrderExecutor::new(Arc::clone(&exchange), allow_list.clone()));
    let trade_log = TradeLog::new(trading_config.trade_log_path.clone());

    // 알림 핸드오프 채널 및 봇 이벤트 루프
    let (dispatcher, rx) = NotificationDispatcher::channel();
    let shutdown_token = CancellationToken::new();

    let notify_chat_id = match TelegramConfig::from_env() {
        Some(telegram_config) => {
            let chat_id = telegram_config.chat_id;
            let bot = BotLoop::new(
                rx,
                Arc::new(TelegramApi::new(telegram_config)),
                Arc::clone(&exchange),
                allow_list.primary().unwrap_or("DOGEUSDT"),
            );
            tokio::spawn(bot.run(shutdown_token.clone()));
            info!(chat_id = chat_id, "Telegram notification bot started");
            Some(chat_id)
        }
        None => {
            warn!("Telegram not configured, trade notifications disabled. Set TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID.");
            drop(rx);
            None
        }
    };

    let state = AppState::new(executor, trade_log, dispatcher, notify_chat_id);
    let app = create_app(state);

    info!(%addr, allowed_pairs = ?trading_config.allowed_pairs, "Webhook gateway listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server shutdown initiated, cleaning up...");

    // 봇 루프에 종료 전파 후 잠시 대기
    shutdown_token.cancel();
    tokio::time::sleep(Duration::from_millis(500)).await;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
