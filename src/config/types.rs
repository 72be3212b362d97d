use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub vectorizer: VectorizerConfig,
    pub cache: CacheConfig,
    pub similarity: SimilarityConfig,
    pub message: MessageConfig,
    pub log_level: LogLevel,
    pub faq: FaqConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub token: String,
    #[serde(default)]
    pub super_admins: Vec<i64>,
    /// Empty means every chat is served.
    #[serde(default)]
    pub allowed_chat_ids: Vec<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: "YOUR_TELEGRAM_BOT_TOKEN".to_string(),
            super_admins: Vec::new(),
            allowed_chat_ids: Vec::new(),
        }
    }
}

/// Which scheme turns questions and queries into vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum VectorizerKind {
    #[default]
    Tfidf,
    Embedding,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorizerConfig {
    pub kind: VectorizerKind,
    pub model: String,
    pub ndims: usize,
    pub api_keys: Vec<String>,
    /// Requests per minute allowed for each key.
    pub rpm: u32,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            kind: VectorizerKind::Tfidf,
            model: "gemini-embedding-exp-03-07".to_string(),
            ndims: 3072,
            api_keys: vec!["YOUR_API_KEY".to_string()],
            rpm: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: "cache".to_string(),
        }
    }
}

pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I couldn't find a close FAQ match. Try rephrasing your question more clearly.";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarityConfig {
    /// Overrides the per-vectorizer default when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub show_confidence: bool,
    pub fallback_message: String,
}

impl SimilarityConfig {
    /// The embedding default comes from MiniLM sentence vectors. Other models score on
    /// their own scale, so set `threshold` explicitly for them.
    pub fn threshold_for(&self, kind: VectorizerKind) -> f64 {
        self.threshold.unwrap_or(match kind {
            VectorizerKind::Tfidf => 0.3,
            VectorizerKind::Embedding => 0.45,
        })
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            show_confidence: true,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageConfig {
    /// Messages older than this many seconds are ignored.
    pub timeout: i64,
    pub history_limit: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            timeout: 60,
            history_limit: 20,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaqConfig {
    pub path: String,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: "docs/faqs.json".to_string(),
        }
    }
}
