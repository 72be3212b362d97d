use crate::{
    config::Config,
    faq::{persistence::EmbeddingCache, types::FaqEntry, utils},
    vectorize::key_manager::KeyManager,
};
use anyhow::{Result, anyhow};
use rig::{
    client::EmbeddingsClient, embeddings::builder::EmbeddingsBuilder,
    providers::gemini::Client as GeminiClient,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const MAX_ATTEMPTS: u32 = 10;

/// Delay between two uncached requests when `keys` keys each allow `rpm` per minute.
fn request_interval(rpm: u32, keys: usize) -> Duration {
    match rpm as u64 * keys as u64 {
        0 => Duration::from_secs(3600),
        total => Duration::from_millis(60_000 / total),
    }
}

/// Sentence embeddings from a hosted model, with an on-disk cache for question vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingVectorizer {
    config: Arc<Config>,
    key_manager: Arc<KeyManager>,
}

impl EmbeddingVectorizer {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let key_manager = KeyManager::new(config.vectorizer.api_keys.clone());
        if key_manager.len() == 0 {
            return Err(anyhow!("No API keys configured for embeddings."));
        }
        Ok(Self {
            config,
            key_manager: Arc::new(key_manager),
        })
    }

    /// Embeds every question, reusing cached vectors and requesting only the misses.
    /// Requests are spaced so all keys together stay under their per-minute limit.
    pub async fn embed_questions(&self, entries: &[FaqEntry]) -> Result<Vec<Vec<f64>>> {
        let mut cache = EmbeddingCache::open(&self.config)?;
        let pace = request_interval(self.config.vectorizer.rpm, self.key_manager.len());

        let mut vectors = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let question_hash = utils::get_question_hash(&entry.question);
            if let Some(cached) = cache.get(&question_hash) {
                vectors.push(cached.to_vec());
                continue;
            }

            log::info!(
                "Embedding question {}/{}: '{}'",
                idx + 1,
                entries.len(),
                utils::truncate(&entry.question, 50)
            );
            if cache.is_dirty() {
                sleep(pace).await;
            }
            let embedding = self.embed(&entry.question).await?;
            cache.insert(question_hash, embedding.clone());
            vectors.push(embedding);
        }

        cache.save()?;
        Ok(vectors)
    }

    /// Embeds one text, rotating keys on rate limits and retrying other failures.
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let mut attempts = 0;

        loop {
            if attempts >= MAX_ATTEMPTS {
                return Err(anyhow!(
                    "Failed to generate embedding after {} attempts. All keys might be exhausted.",
                    MAX_ATTEMPTS
                ));
            }
            attempts += 1;

            let api_key = match self.key_manager.get_key() {
                Ok(key) => key,
                Err(e) => {
                    log::error!("Could not get API key: {}. Retrying in 60s.", e);
                    sleep(Duration::from_secs(60)).await;
                    continue;
                }
            };

            match self.generate_single_embedding(&api_key, text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) => {
                    let error_string = e.to_string().to_lowercase();
                    if error_string.contains("429")
                        || error_string.contains("resource has been exhausted")
                    {
                        log::warn!("API key rate-limited. Disabling it. Error: {}", e);
                        self.key_manager.disable_key(&api_key);
                        continue;
                    } else {
                        log::error!("Failed to generate embedding: {}. Retrying in 5s...", e);
                        sleep(Duration::from_secs(5)).await;
                        continue;
                    }
                }
            }
        }
    }

    async fn generate_single_embedding(&self, api_key: &str, text: &str) -> Result<Vec<f64>> {
        let gemini_client = GeminiClient::new(api_key);
        let model = gemini_client.embedding_model_with_ndims(
            &self.config.vectorizer.model,
            self.config.vectorizer.ndims,
        );
        let builder = EmbeddingsBuilder::new(model.clone()).document(text.to_string())?;
        let embeddings = builder.build().await?;
        let embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No embedding generated"))?
            .1
            .first()
            .vec;
        Ok(embedding)
    }
}
