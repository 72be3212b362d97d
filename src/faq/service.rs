//! FaqService is the facade the bot talks to. It owns the knowledge base, the
//! vectorizer fitted on it, and the configuration that decides thresholds and the
//! fallback text.

use super::{
    persistence, search,
    types::{FaqEntry, KnowledgeBase, Reply},
    utils,
};
use crate::{config::Config, vectorize::Vectorizer};
use anyhow::Result;
use std::sync::Arc;

pub struct FaqService {
    knowledge: KnowledgeBase,
    vectorizer: Vectorizer,
    pub config: Arc<Config>,
}

impl FaqService {
    /// Creates a service with an empty knowledge base.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let vectorizer = Vectorizer::from_config(&config)?;
        Ok(Self {
            knowledge: KnowledgeBase::new(),
            vectorizer,
            config,
        })
    }

    /// Reads the configured FAQ file and vectorizes every question.
    pub async fn load_from_file(&mut self) -> Result<()> {
        let entries = persistence::load_faq_entries(&self.config.faq.path)?;
        self.load_entries(entries).await
    }

    /// Replaces the knowledge base. Question vectors are recomputed from scratch.
    pub async fn load_entries(&mut self, entries: Vec<FaqEntry>) -> Result<()> {
        let vectors = self.vectorizer.fit(&entries).await?;
        log::info!(
            "Vectorized {} questions with {:?}",
            vectors.len(),
            self.vectorizer.kind()
        );
        self.knowledge = KnowledgeBase {
            entries,
            question_vectors: vectors,
        };
        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.config.similarity.threshold_for(self.vectorizer.kind())
    }

    /// Answers `query` with the closest stored answer, or the fallback message when
    /// nothing reaches the threshold.
    pub async fn answer(&self, query: &str) -> Result<Reply> {
        let fallback = |best_score: Option<f64>| Reply::Fallback {
            text: self.config.similarity.fallback_message.clone(),
            best_score,
        };

        if self.knowledge.question_vectors.is_empty() {
            log::warn!("Query received with no FAQ entries loaded.");
            return Ok(fallback(None));
        }

        let query_vector = self.vectorizer.encode(query).await?;

        let Some((index, similarity)) =
            search::find_best_match(&query_vector, &self.knowledge.question_vectors)
        else {
            return Ok(fallback(None));
        };

        let threshold = self.threshold();
        let entry = &self.knowledge.entries[index];
        if similarity >= threshold {
            log::info!(
                "Match found for query '{}': Q#{} ('{}') with similarity {:.4}",
                utils::truncate(query, 70),
                index,
                utils::truncate(&entry.question, 70),
                similarity
            );
            Ok(Reply::Answer {
                text: entry.answer.clone(),
                score: similarity,
                index,
            })
        } else {
            log::info!(
                "No match above threshold {:.2} for query: '{}'. Best match was Q#{} ('{}') with similarity {:.4}",
                threshold,
                utils::truncate(query, 70),
                index,
                utils::truncate(&entry.question, 70),
                similarity
            );
            Ok(fallback(Some(similarity)))
        }
    }

    // --- Accessors for bot logic ---

    pub fn entries(&self) -> &[FaqEntry] {
        &self.knowledge.entries
    }

    pub fn search_questions(&self, keywords: &str) -> Vec<FaqEntry> {
        search::search_by_keyword(&self.knowledge.entries, keywords)
    }

    pub fn len(&self) -> usize {
        self.knowledge.entries.len()
    }

    pub fn question_vectors_len(&self) -> usize {
        self.knowledge.question_vectors.len()
    }
}
