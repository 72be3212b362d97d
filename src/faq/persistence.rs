use crate::config::Config;
use crate::faq::types::{FaqEntry, FaqFileRepr};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Loads FAQ entries from a JSON file. Creates the directory and an empty file if they don't exist.
/// Entries with a blank question or answer are dropped.
pub fn load_faq_entries(faq_json_path: &str) -> Result<Vec<FaqEntry>> {
    log::info!("Loading FAQ data from: {}", faq_json_path);
    let path = Path::new(faq_json_path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    }

    if !path.exists() {
        log::warn!("No FAQ file at {}, starting with an empty one.", path.display());
        fs::write(path, "[]")
            .with_context(|| format!("Failed to create empty FAQ file at: {}", path.display()))?;
    }

    let faq_data_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read FAQ JSON file from: {}", faq_json_path))?;

    let repr: FaqFileRepr = serde_json::from_str(&faq_data_str)
        .with_context(|| format!("Failed to deserialize FAQ JSON from: {}", faq_json_path))?;
    let entries: Vec<FaqEntry> = repr.into();

    let total = entries.len();
    let entries: Vec<FaqEntry> = entries
        .into_iter()
        .filter(|entry| !entry.question.trim().is_empty() && !entry.answer.trim().is_empty())
        .collect();
    if entries.len() < total {
        log::warn!(
            "Skipped {} FAQ entries with an empty question or answer in {}",
            total - entries.len(),
            faq_json_path
        );
    }

    log::info!(
        "Successfully loaded {} FAQ entries from {}",
        entries.len(),
        faq_json_path
    );
    Ok(entries)
}

/// Question vectors already fetched for one embedding model, keyed by question hash.
///
/// Lives at `<cache.dir>/embeddings_cache_<model>.json`, with every non-alphanumeric
/// character of the model name replaced by `_`.
#[derive(Debug)]
pub struct EmbeddingCache {
    path: PathBuf,
    vectors: HashMap<String, Vec<f64>>,
    dirty: bool,
}

impl EmbeddingCache {
    /// An unreadable cache file is treated as empty and overwritten on the next save.
    pub fn open(config: &Config) -> Result<Self> {
        let dir = Path::new(&config.cache.dir);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
        let model: String = config
            .vectorizer
            .model
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let path = dir.join(format!("embeddings_cache_{}.json", model));

        let vectors = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable cache {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache {}", path.display()));
            }
        };
        log::info!("Opened {} with {} vectors", path.display(), vectors.len());

        Ok(Self {
            path,
            vectors,
            dirty: false,
        })
    }

    pub fn get(&self, question_hash: &str) -> Option<&[f64]> {
        self.vectors.get(question_hash).map(Vec::as_slice)
    }

    pub fn insert(&mut self, question_hash: String, vector: Vec<f64>) {
        self.vectors.insert(question_hash, vector);
        self.dirty = true;
    }

    /// True once something has been inserted since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the cache back, skipping the write when nothing changed.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string(&self.vectors).context("Failed to encode cache")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write cache {}", self.path.display()))?;
        log::info!("Saved {} vectors to {}", self.vectors.len(), self.path.display());
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("faqs.json");

        let entries = load_faq_entries(path.to_str().unwrap()).unwrap();

        assert!(entries.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn blank_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faqs.json");
        fs::write(
            &path,
            r#"[
                {"question": "What is an OS?", "answer": "System software."},
                {"question": "   ", "answer": "orphan"},
                {"question": "No answer", "answer": ""}
            ]"#,
        )
        .unwrap();

        let entries = load_faq_entries(path.to_str().unwrap()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "What is an OS?");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faqs.json");
        fs::write(&path, r#"{"q": ["not", "a", "string"]}"#).unwrap();

        let err = load_faq_entries(path.to_str().unwrap()).unwrap_err();

        assert!(err.to_string().contains("Failed to deserialize FAQ JSON"));
    }

    #[test]
    fn embedding_cache_persists_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.cache.dir = dir.path().join("cache").to_string_lossy().into_owned();
        config.vectorizer.model = "text-embedding/v1".to_string();

        let mut cache = EmbeddingCache::open(&config).unwrap();
        assert!(cache.get("abc").is_none());
        assert!(cache.path().ends_with("embeddings_cache_text_embedding_v1.json"));

        cache.insert("abc".to_string(), vec![0.5, -0.25]);
        assert!(cache.is_dirty());
        cache.save().unwrap();
        assert!(!cache.is_dirty());

        let reopened = EmbeddingCache::open(&config).unwrap();
        assert_eq!(reopened.get("abc"), Some(&[0.5, -0.25][..]));
    }

    #[test]
    fn unchanged_cache_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.cache.dir = dir.path().to_string_lossy().into_owned();

        let mut cache = EmbeddingCache::open(&config).unwrap();
        cache.save().unwrap();

        assert!(!cache.path().exists());
    }

    #[test]
    fn corrupt_cache_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.cache.dir = dir.path().to_string_lossy().into_owned();
        let path = EmbeddingCache::open(&config).unwrap().path().to_path_buf();
        fs::write(&path, "{not json").unwrap();

        let cache = EmbeddingCache::open(&config).unwrap();

        assert!(cache.get("anything").is_none());
        assert!(!cache.is_dirty());
    }
}
