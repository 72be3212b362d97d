//! Per-chat conversation history. It is kept only so that `/history` can show it.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub confidence: Option<u32>,
    pub at: DateTime<Utc>,
}

/// Append-only list of turns in arrival order.
#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: &str) {
        self.push(Speaker::User, text, None);
    }

    pub fn push_bot(&mut self, text: &str, confidence: Option<u32>) {
        self.push(Speaker::Bot, text, confidence);
    }

    fn push(&mut self, speaker: Speaker, text: &str, confidence: Option<u32>) {
        self.turns.push(Turn {
            speaker,
            text: text.to_string(),
            confidence,
            at: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_are_kept_in_arrival_order() {
        let mut log = ConversationLog::new();
        log.push_user("what is rust");
        log.push_bot("A systems language.", Some(92));

        let turns = log.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[0].confidence, None);
        assert_eq!(turns[1].speaker, Speaker::Bot);
        assert_eq!(turns[1].confidence, Some(92));
        assert!(turns[0].at <= turns[1].at);
    }

    #[test]
    fn clear_empties_any_log() {
        for size in [0usize, 1, 57] {
            let mut log = ConversationLog::new();
            for i in 0..size {
                log.push_user(&format!("message {i}"));
            }
            log.clear();
            assert!(log.is_empty());
            assert_eq!(log.len(), 0);
        }
    }

    #[test]
    fn recent_returns_the_tail() {
        let mut log = ConversationLog::new();
        for i in 0..5 {
            log.push_user(&i.to_string());
        }

        let tail: Vec<&str> = log.recent(2).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(tail, vec!["3", "4"]);
        assert_eq!(log.recent(10).len(), 5);
    }
}
