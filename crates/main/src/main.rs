//! 主应用程序入口
//!
//! 启动 Axum WebSocket 中继服务。

use std::sync::Arc;

use application::{
    Clock, MessageRouter, MpscTransport, PresenceNotifier, SessionRegistry, SystemClock, Transport,
};
use config::AppConfig;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 读取环境变量配置
    let config = AppConfig::from_env();
    config.validate()?;

    // 装配核心服务：一套注册表/路由器/通知器供所有连接共享
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let transport = Arc::new(MpscTransport::new());
    let registry = Arc::new(SessionRegistry::new(clock.clone()));
    let message_router = Arc::new(MessageRouter::new(
        registry.clone(),
        transport.clone() as Arc<dyn Transport>,
        clock,
    ));
    let notifier = Arc::new(PresenceNotifier::new(
        registry.clone(),
        message_router.clone(),
        transport.clone() as Arc<dyn Transport>,
    ));

    let state = AppState::new(
        registry,
        message_router,
        notifier,
        transport,
        config.relay.max_frame_bytes,
    );

    // 启动 Web 服务器
    let app = router(state);
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;

    tracing::info!(
        "聊天中继服务器启动在 http://{}:{}",
        config.server.host,
        config.server.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
