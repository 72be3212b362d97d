pub mod conversation;
pub mod persistence;
pub mod search;
pub mod service;
pub mod types;
pub mod utils;

pub use conversation::ConversationLog;
pub use service::FaqService;
pub use types::{FaqEntry, Reply};
