//! 聊天中继核心领域模型
//!
//! 定义连接、会话、消息载荷与出站消息等值类型，以及错误分类。

pub mod errors;
pub mod events;
pub mod outbound;
pub mod payload;
pub mod session;
pub mod value_objects;

pub use errors::*;
pub use events::*;
pub use outbound::*;
pub use payload::*;
pub use session::*;
pub use value_objects::*;
