use axum::{
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::ws_connection::RelayConnection;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(websocket_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn websocket_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    // 帧尺寸上限由传输层把关，媒体大小控制不进入路由核心
    ws.max_message_size(state.max_frame_bytes)
        .on_upgrade(move |socket| RelayConnection::new(socket, state).run())
}
