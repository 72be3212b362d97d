use crate::bot::state::AppState;
use crate::bot::utils::{accepts_message, format_reply_html};
use crate::config::Config;
use crate::faq::{FaqService, utils::truncate};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, Message, ParseMode};
use tokio::sync::Mutex;

/// Treats every plain text message as a question for the FAQ.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    faq_service: Arc<Mutex<FaqService>>,
    cfg: Arc<Config>,
    state: Arc<Mutex<AppState>>,
) -> Result<(), anyhow::Error> {
    if !accepts_message(msg.chat.id, msg.date, chrono::Utc::now(), &cfg) {
        return Ok(());
    }

    let query = match msg.text().map(str::trim) {
        Some(text) if !text.is_empty() && !text.starts_with('/') => text,
        _ => return Ok(()),
    };

    log::info!(
        "Chat ID: {}, Received question: {}",
        msg.chat.id,
        truncate(query, 70)
    );

    let reply = {
        let service_guard = faq_service.lock().await;
        match service_guard.answer(query).await {
            Ok(reply) => reply,
            Err(e) => {
                // Avoid sending error messages in the chat
                log::error!("Error finding matching FAQ: {:?}", e);
                return Ok(());
            }
        }
    };

    match reply.matched_index() {
        Some(index) => log::debug!("Replying to chat {} with FAQ #{}", msg.chat.id, index),
        None => log::debug!("Replying to chat {} with the fallback", msg.chat.id),
    }
    let confidence = if cfg.similarity.show_confidence {
        reply.confidence_percent()
    } else {
        None
    };
    {
        let mut state_guard = state.lock().await;
        let conversation = state_guard.conversation_mut(msg.chat.id);
        conversation.push_user(query);
        conversation.push_bot(reply.text(), confidence);
    }

    bot.send_message(
        msg.chat.id,
        format_reply_html(&reply, cfg.similarity.show_confidence),
    )
    .link_preview_options(LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    })
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}
