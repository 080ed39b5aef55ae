use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use tracing::warn;

use crate::store::latency::UniformLatency;

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub session_path: PathBuf,
    /// Max serialized size of the collections slot, if any
    pub store_quota_bytes: Option<usize>,

    // Simulated latency
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,

    pub log_dir: PathBuf,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/vjgote_cloud_db_v2.json"),
            session_path: PathBuf::from("data/vjgote_session.json"),
            store_quota_bytes: None,
            latency_min_ms: UniformLatency::DEFAULT_MIN_MS,
            latency_max_ms: UniformLatency::DEFAULT_MAX_MS,
            log_dir: PathBuf::from("logs"),
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            store_path: lookup("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            session_path: lookup("SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_path),
            store_quota_bytes: lookup("STORE_QUOTA_BYTES")
                .and_then(|raw| parse_or_warn("STORE_QUOTA_BYTES", &raw)),
            latency_min_ms: lookup("LATENCY_MIN_MS")
                .and_then(|raw| parse_or_warn("LATENCY_MIN_MS", &raw))
                .unwrap_or(defaults.latency_min_ms),
            latency_max_ms: lookup("LATENCY_MAX_MS")
                .and_then(|raw| parse_or_warn("LATENCY_MAX_MS", &raw))
                .unwrap_or(defaults.latency_max_ms),
            log_dir: lookup("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .and_then(|raw| parse_or_warn("SEED_DEMO_DATA", &raw))
                .unwrap_or(defaults.seed_demo_data),
        }
    }

    /// Configured latency, or the default range if the configured one is
    /// outside `0..=5000` ms or inverted.
    pub fn latency(&self) -> UniformLatency {
        UniformLatency::new(self.latency_min_ms, self.latency_max_ms).unwrap_or_else(|| {
            warn!(
                min_ms = self.latency_min_ms,
                max_ms = self.latency_max_ms,
                "Latency range not recognized, using default"
            );
            UniformLatency::default()
        })
    }
}

fn parse_or_warn<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw, "Ignoring unparsable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.latency(), UniformLatency::default());
        assert_eq!(config.store_quota_bytes, None);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_PATH", "/tmp/db.json"),
            ("STORE_QUOTA_BYTES", "5242880"),
            ("LATENCY_MIN_MS", "0"),
            ("LATENCY_MAX_MS", "0"),
            ("SEED_DEMO_DATA", "false"),
        ]));

        assert_eq!(config.store_path, PathBuf::from("/tmp/db.json"));
        assert_eq!(config.store_quota_bytes, Some(5_242_880));
        assert_eq!(config.latency().max(), Duration::ZERO);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("LATENCY_MIN_MS", "fast"),
            ("LATENCY_MAX_MS", "60000"),
            ("STORE_QUOTA_BYTES", "-1"),
        ]));

        assert_eq!(config.latency_min_ms, UniformLatency::DEFAULT_MIN_MS);
        assert_eq!(config.latency(), UniformLatency::default());
        assert_eq!(config.store_quota_bytes, None);
    }
}
