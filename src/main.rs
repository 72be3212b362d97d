use anyhow::Context as _;
use bot::{
    commands::{Command, command_handler},
    message::message_handler,
    state::AppState,
};
use config::{VectorizerKind, load_user_config};
use faq::{FaqService, utils::truncate};
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::sync::Mutex;

mod bot;
mod config;
mod faq;
mod vectorize;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = Arc::new(load_user_config().context("Failed to load configuration")?);

    let log_level: log::Level = cfg.log_level.clone().into();
    simple_logger::init_with_level(log_level).context("Failed to initialize logger")?;

    let app_state = Arc::new(Mutex::new(AppState::new()));

    log::info!(
        "Initializing FAQ service with {:?} vectorizer...",
        cfg.vectorizer.kind
    );
    let faq_service = Arc::new(Mutex::new(FaqService::new(cfg.clone())?));
    {
        let mut service_guard = faq_service.lock().await;
        log::info!("Loading and vectorizing FAQ data from: {}", cfg.faq.path);
        if let Err(e) = service_guard.load_from_file().await {
            log::error!("Error loading FAQ data: {:?}", e);
        } else {
            log::info!("Successfully loaded and processed FAQ data.");
            log::info!("Number of FAQ entries: {}", service_guard.len());
            log::info!(
                "Number of question vectors: {}",
                service_guard.question_vectors_len()
            );
            log::info!("Similarity threshold: {:.2}", service_guard.threshold());
            if cfg.vectorizer.kind == VectorizerKind::Embedding
                && cfg.similarity.threshold.is_none()
            {
                log::warn!(
                    "similarity.threshold is unset; the embedding default may not suit {}",
                    cfg.vectorizer.model
                );
            }
        }
    }

    log::info!(
        "Bot starting with token: {}...",
        truncate(&cfg.telegram.token, 8)
    );

    let bot = Bot::new(cfg.telegram.token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {:?}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![faq_service, cfg.clone(), app_state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Bot stopped.");
    Ok(())
}
