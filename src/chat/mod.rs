pub mod api;
pub mod client;
pub mod listener;
pub mod message;
pub mod serialization;
pub mod types;

// 重新导出消息同步相关类型
pub use client::{ChatClient, ClientConfig, ConnectionState};
pub use listener::{ChatListener, EmptyChatListener};
pub use message::view::ConversationView;
