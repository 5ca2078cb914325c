//! 应用层实现。
//!
//! 围绕领域模型的核心服务：会话注册表、消息路由器、在线通知器、
//! 连接生命周期状态机，以及面向传输适配器的端口抽象。

pub mod clock;
pub mod lifecycle;
pub mod notifier;
pub mod registry;
pub mod router;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use lifecycle::{ConnectionLifecycle, ConnectionState};
pub use notifier::PresenceNotifier;
pub use registry::SessionRegistry;
pub use router::MessageRouter;
pub use transport::{MpscTransport, Transport};
