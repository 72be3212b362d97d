//! Text-to-vector schemes. The same scheme must encode both the stored questions
//! and incoming queries, so a `Vectorizer` is fitted once per knowledge base load.

use crate::config::{Config, VectorizerKind};
use crate::faq::types::FaqEntry;
use anyhow::Result;
use std::sync::Arc;

pub mod embedding;
pub mod key_manager;
pub mod tfidf;

pub use embedding::EmbeddingVectorizer;
pub use tfidf::TfidfModel;

#[derive(Debug, Clone)]
pub enum Vectorizer {
    Tfidf(TfidfModel),
    Embedding(EmbeddingVectorizer),
}

impl Vectorizer {
    pub fn from_config(config: &Arc<Config>) -> Result<Self> {
        match config.vectorizer.kind {
            VectorizerKind::Tfidf => Ok(Vectorizer::Tfidf(TfidfModel::default())),
            VectorizerKind::Embedding => Ok(Vectorizer::Embedding(EmbeddingVectorizer::new(
                config.clone(),
            )?)),
        }
    }

    pub fn kind(&self) -> VectorizerKind {
        match self {
            Vectorizer::Tfidf(_) => VectorizerKind::Tfidf,
            Vectorizer::Embedding(_) => VectorizerKind::Embedding,
        }
    }

    /// Prepares the scheme for `entries` and returns one vector per question.
    pub async fn fit(&mut self, entries: &[FaqEntry]) -> Result<Vec<Vec<f64>>> {
        match self {
            Vectorizer::Tfidf(model) => {
                let questions: Vec<&str> = entries.iter().map(|e| e.question.as_str()).collect();
                *model = TfidfModel::fit(questions.as_slice());
                Ok(questions.iter().map(|q| model.transform(q)).collect())
            }
            Vectorizer::Embedding(embedder) => embedder.embed_questions(entries).await,
        }
    }

    pub async fn encode(&self, text: &str) -> Result<Vec<f64>> {
        match self {
            Vectorizer::Tfidf(model) => Ok(model.transform(text)),
            Vectorizer::Embedding(embedder) => embedder.embed(text).await,
        }
    }
}
