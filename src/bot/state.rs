use crate::faq::ConversationLog;
use std::collections::HashMap;
use teloxide::types::ChatId;

/// The overall application state, shared across handlers.
#[derive(Default)]
pub struct AppState {
    /// One conversation log per chat, created on first use.
    pub conversations: HashMap<ChatId, ConversationLog>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_mut(&mut self, chat_id: ChatId) -> &mut ConversationLog {
        self.conversations.entry(chat_id).or_default()
    }

    /// Clears the chat's log and returns how many turns were dropped.
    pub fn clear_conversation(&mut self, chat_id: ChatId) -> usize {
        match self.conversations.get_mut(&chat_id) {
            Some(log) => {
                let dropped = log.len();
                log.clear();
                dropped
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversations_are_kept_per_chat() {
        let mut state = AppState::new();
        state.conversation_mut(ChatId(1)).push_user("hello");
        state.conversation_mut(ChatId(1)).push_bot("hi", None);
        state.conversation_mut(ChatId(2)).push_user("other chat");

        assert_eq!(state.clear_conversation(ChatId(1)), 2);
        assert!(state.conversation_mut(ChatId(1)).is_empty());
        assert_eq!(state.conversation_mut(ChatId(2)).len(), 1);
        assert_eq!(state.clear_conversation(ChatId(99)), 0);
    }
}
