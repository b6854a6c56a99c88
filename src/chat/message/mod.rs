pub mod grouping;
pub mod types;
pub mod view;

pub use types::{ChatMessage, ParticipantProfile, PartyRef};
pub use view::ConversationView;
