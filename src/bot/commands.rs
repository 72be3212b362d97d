use crate::{
    bot::{
        state::AppState,
        utils::{
            accepts_message, format_history_html, format_question_list_html, is_super_admin,
        },
    },
    config::Config,
    faq::FaqService,
};
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};
use tokio::sync::Mutex;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "show this text.")]
    Help,
    #[command(description = "clear the conversation history of this chat.")]
    Clear,
    #[command(description = "show the recent conversation.")]
    History,
    #[command(description = "list every known question.")]
    Faqs,
    #[command(description = "find questions containing the given words.")]
    Search(String),
    #[command(description = "reload the FAQ file and recompute vectors (super admins only).")]
    Reload,
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<Mutex<AppState>>,
    faq_service: Arc<Mutex<FaqService>>,
    cfg: Arc<Config>,
) -> Result<(), anyhow::Error> {
    if !accepts_message(msg.chat.id, msg.date, chrono::Utc::now(), &cfg) {
        return Ok(());
    }

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Clear => {
            let dropped = state.lock().await.clear_conversation(msg.chat.id);
            log::info!("Cleared {} turns in chat {}", dropped, msg.chat.id);
            bot.send_message(msg.chat.id, "🧹 Conversation cleared.")
                .await?;
        }
        Command::History => {
            let text = {
                let mut state_guard = state.lock().await;
                let conversation = state_guard.conversation_mut(msg.chat.id);
                format_history_html(conversation.recent(cfg.message.history_limit))
            };
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Faqs => {
            let text = {
                let service_guard = faq_service.lock().await;
                if service_guard.len() == 0 {
                    "No FAQ entries are loaded.".to_string()
                } else {
                    format_question_list_html(service_guard.entries())
                }
            };
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Search(keywords) => {
            if keywords.trim().is_empty() {
                bot.send_message(msg.chat.id, "Usage: /search <keywords>")
                    .await?;
                return Ok(());
            }
            let matches = faq_service.lock().await.search_questions(&keywords);
            let text = if matches.is_empty() {
                format!(
                    "No questions contain \"{}\".",
                    teloxide::utils::html::escape(keywords.trim())
                )
            } else {
                format_question_list_html(&matches)
            };
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Reload => {
            let allowed = msg
                .from
                .as_ref()
                .is_some_and(|user| is_super_admin(user.id, &cfg));
            if !allowed {
                log::warn!("Ignoring /reload from non-super-admin in chat {}", msg.chat.id);
                bot.send_message(msg.chat.id, "Only super admins can reload the FAQ.")
                    .await?;
                return Ok(());
            }

            let mut service_guard = faq_service.lock().await;
            match service_guard.load_from_file().await {
                Ok(()) => {
                    log::info!("Reloaded {} FAQ entries", service_guard.len());
                    bot.send_message(
                        msg.chat.id,
                        format!("✅ Reloaded {} FAQ entries.", service_guard.len()),
                    )
                    .await?;
                }
                Err(e) => {
                    log::error!("Failed to reload FAQ: {:?}", e);
                    bot.send_message(msg.chat.id, format!("Error reloading FAQ: {}", e))
                        .await?;
                }
            }
        }
    }
    Ok(())
}
