//! Web API 层。
//!
//! 提供 Axum 路由，把每个 WebSocket 连接接入应用层的
//! 会话注册表 / 消息路由器 / 在线通知器。

mod routes;
mod state;
mod ws_connection;

pub use routes::router;
pub use state::AppState;
