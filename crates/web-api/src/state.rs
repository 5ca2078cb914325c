use std::sync::Arc;

use application::{MessageRouter, MpscTransport, PresenceNotifier, SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub router: Arc<MessageRouter>,
    pub notifier: Arc<PresenceNotifier>,
    pub transport: Arc<MpscTransport>,
    pub max_frame_bytes: usize,
}

impl AppState {
    pub fn new(
        registry: Arc<SessionRegistry>,
        router: Arc<MessageRouter>,
        notifier: Arc<PresenceNotifier>,
        transport: Arc<MpscTransport>,
        max_frame_bytes: usize,
    ) -> Self {
        Self {
            registry,
            router,
            notifier,
            transport,
            max_frame_bytes,
        }
    }
}
