use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
mod types;

pub use types::*;

const APP_DIR: &str = "faqbot";
const CONFIG_FILE: &str = "config.toml";

/// Loads `config.toml` from the per-user config directory (`~/.config/faqbot` on Linux).
pub fn load_user_config() -> Result<Config> {
    let dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join(APP_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;

    load_config_from(&dir.join(CONFIG_FILE))
}

/// Reads the config at `path`. A missing file is written with defaults; a file that
/// does not parse is renamed to `.bak` first.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return write_defaults(path),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read config {}", path.display()));
        }
    };

    toml::from_str::<Config>(&content).or_else(|parse_error| -> Result<Config> {
        let backup = path.with_extension("bak");
        fs::rename(path, &backup).with_context(|| {
            format!("Failed to move invalid config to {}", backup.display())
        })?;
        // Runs before the logger is initialised.
        eprintln!(
            "Invalid config ({}). Kept the old file as {}.",
            parse_error,
            backup.display()
        );
        write_defaults(path)
    })
}

fn write_defaults(path: &Path) -> Result<Config> {
    let config = Config::default();
    let content =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write default config {}", path.display()))?;
    eprintln!("Wrote default config to {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = load_config_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg.vectorizer.kind, VectorizerKind::Tfidf);
        assert_eq!(cfg.faq.path, "docs/faqs.json");
        assert_eq!(cfg.similarity.fallback_message, DEFAULT_FALLBACK_MESSAGE);
    }

    #[test]
    fn broken_config_is_backed_up_and_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(
            fs::read_to_string(path.with_extension("bak")).unwrap(),
            "this is = = not toml"
        );
        assert_eq!(cfg.message.history_limit, 20);
        // The regenerated file parses on the next start.
        assert!(load_config_from(&path).is_ok());
    }

    #[test]
    fn threshold_defaults_depend_on_vectorizer() {
        let mut similarity = SimilarityConfig::default();
        assert_eq!(similarity.threshold_for(VectorizerKind::Tfidf), 0.3);
        assert_eq!(similarity.threshold_for(VectorizerKind::Embedding), 0.45);

        similarity.threshold = Some(0.2);
        assert_eq!(similarity.threshold_for(VectorizerKind::Embedding), 0.2);
    }

    #[test]
    fn explicit_threshold_is_read_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut content = toml::to_string_pretty(&Config::default()).unwrap();
        content = content.replace(
            "[similarity]\n",
            "[similarity]\nthreshold = 0.25\n",
        );
        fs::write(&path, content).unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.similarity.threshold, Some(0.25));
        assert!(!path.with_extension("bak").exists());
    }
}
