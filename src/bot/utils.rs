use crate::config::Config;
use crate::faq::{
    FaqEntry, Reply,
    conversation::{Speaker, Turn},
};
use chrono::{DateTime, Utc};
use teloxide::{
    types::{ChatId, UserId},
    utils::html,
};

/// Checks if a user is a super admin based on the configuration.
pub fn is_super_admin(user_id: UserId, config: &Config) -> bool {
    config.telegram.super_admins.contains(&(user_id.0 as i64))
}

pub fn is_allowed_chat(chat_id: ChatId, config: &Config) -> bool {
    config.telegram.allowed_chat_ids.is_empty()
        || config.telegram.allowed_chat_ids.contains(&chat_id.0)
}

/// Gate shared by commands and questions: the chat must be allowed and the
/// message no older than `message.timeout` seconds.
pub fn accepts_message(
    chat_id: ChatId,
    sent_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &Config,
) -> bool {
    if !is_allowed_chat(chat_id, config) {
        log::warn!("Ignoring message from unauthorized chat: {}", chat_id);
        return false;
    }

    let age = (now - sent_at).num_seconds();
    if age > config.message.timeout {
        log::info!("Ignoring old message ({}s old) from chat {}", age, chat_id);
        return false;
    }
    true
}

pub fn format_answer_html(answer: &str) -> String {
    format!("<blockquote>{}</blockquote>", html::escape(answer))
}

pub fn format_reply_html(reply: &Reply, show_confidence: bool) -> String {
    match (reply.confidence_percent(), show_confidence) {
        (Some(percent), true) => format!(
            "{}\n<i>Confidence: {}%</i>",
            format_answer_html(reply.text()),
            percent
        ),
        (Some(_), false) => format_answer_html(reply.text()),
        (None, _) => html::escape(reply.text()),
    }
}

pub fn format_history_html(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "No conversation yet.".to_string();
    }
    turns
        .iter()
        .map(|turn| {
            let who = match turn.speaker {
                Speaker::User => "You",
                Speaker::Bot => "Bot",
            };
            let line = format!(
                "<code>{}</code> <b>{}:</b> {}",
                turn.at.format("%H:%M"),
                who,
                html::escape(&turn.text)
            );
            match turn.confidence {
                Some(percent) => format!("{} <i>({}%)</i>", line, percent),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_question_list_html(entries: &[FaqEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {}", i + 1, html::escape(&entry.question)))
        .collect::<Vec<_>>()
        .join("\n")
}
