pub mod chat;

// 重新导出常用类型和函数，方便外部使用
pub use chat::{
    client::{ChatClient, ClientConfig, ConnectionState},
    listener::{ChatListener, EmptyChatListener},
    message::types::{ChatMessage, ParticipantProfile, PartyRef},
    message::view::ConversationView,
};
