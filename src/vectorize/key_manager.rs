use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct ApiKey {
    key: String,
    disabled_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct KeyRing {
    keys: Vec<ApiKey>,
    last_used: Option<usize>,
}

/// Round-robin over the configured embedding API keys. Rate-limited keys sit out
/// until the next UTC midnight.
#[derive(Debug, Clone)]
pub struct KeyManager {
    ring: Arc<Mutex<KeyRing>>,
}

fn suffix(key: &str) -> String {
    let tail: Vec<char> = key.chars().rev().take(4).collect();
    tail.into_iter().rev().collect()
}

impl KeyManager {
    pub fn new(api_keys: Vec<String>) -> Self {
        let keys = api_keys
            .into_iter()
            .map(|key| ApiKey {
                key,
                disabled_until: None,
            })
            .collect();
        Self {
            ring: Arc::new(Mutex::new(KeyRing {
                keys,
                last_used: None,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.ring.lock().map(|ring| ring.keys.len()).unwrap_or(0)
    }

    pub fn get_key(&self) -> Result<String> {
        self.get_key_at(Utc::now())
    }

    fn get_key_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut ring = self
            .ring
            .lock()
            .map_err(|_| anyhow!("API key state is poisoned"))?;

        // Re-enable any keys whose cooldown has expired.
        for api_key in ring.keys.iter_mut() {
            if let Some(disabled_until) = api_key.disabled_until {
                if now >= disabled_until {
                    api_key.disabled_until = None;
                    log::info!("Re-enabling API key ending in ...{}", suffix(&api_key.key));
                }
            }
        }

        if ring.keys.is_empty() {
            return Err(anyhow!("No API keys configured."));
        }

        let count = ring.keys.len();
        let start_idx = ring.last_used.map_or(0, |idx| (idx + 1) % count);
        for i in 0..count {
            let idx = (start_idx + i) % count;
            if ring.keys[idx].disabled_until.is_none() {
                ring.last_used = Some(idx);
                return Ok(ring.keys[idx].key.clone());
            }
        }

        Err(anyhow!(
            "All API keys are currently rate-limited or disabled."
        ))
    }

    pub fn disable_key(&self, key_to_disable: &str) {
        self.disable_key_at(key_to_disable, Utc::now());
    }

    fn disable_key_at(&self, key_to_disable: &str, now: DateTime<Utc>) {
        let Ok(mut ring) = self.ring.lock() else {
            log::error!("API key state is poisoned, cannot disable key");
            return;
        };
        if let Some(api_key) = ring.keys.iter_mut().find(|k| k.key == key_to_disable) {
            let tomorrow = (now.date_naive() + chrono::Duration::days(1)).and_time(NaiveTime::MIN);
            let tomorrow_utc = DateTime::<Utc>::from_naive_utc_and_offset(tomorrow, Utc);
            api_key.disabled_until = Some(tomorrow_utc);
            log::warn!(
                "Disabling API key ending in ...{} until {}",
                suffix(&api_key.key),
                tomorrow_utc
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn keys(names: &[&str]) -> KeyManager {
        KeyManager::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn keys_rotate_round_robin() {
        let manager = keys(&["k1", "k2", "k3"]);

        let picked: Vec<String> = (0..4).map(|_| manager.get_key().unwrap()).collect();

        assert_eq!(picked, vec!["k1", "k2", "k3", "k1"]);
    }

    #[test]
    fn disabled_key_is_skipped_until_midnight() {
        let manager = keys(&["k1", "k2"]);
        let noon = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        manager.disable_key_at("k1", noon);

        assert_eq!(manager.get_key_at(noon).unwrap(), "k2");
        assert_eq!(manager.get_key_at(noon).unwrap(), "k2");

        let next_day = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 1).unwrap();
        assert_eq!(manager.get_key_at(next_day).unwrap(), "k1");
    }

    #[test]
    fn all_disabled_or_none_configured_is_an_error() {
        let manager = keys(&["only"]);
        let now = Utc::now();
        manager.disable_key_at("only", now);
        assert!(manager.get_key_at(now).is_err());

        assert!(keys(&[]).get_key().is_err());
        assert_eq!(keys(&[]).len(), 0);
    }
}
