use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_ADVICE_TIMEOUT_SECS: u64 = 10;
/// ≈60 FPS, one simulation tick per frame.
pub const DEFAULT_FRAME_MS: u64 = 16;
pub const DEFAULT_LOG_FILE: &str = "sky_guardian.log";

/// Runtime configuration - immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// Language the commander speaks in.
    pub language: String,
    pub advice_timeout: Duration,
    pub frame: Duration,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            advice_timeout: Duration::from_secs(DEFAULT_ADVICE_TIMEOUT_SECS),
            frame: Duration::from_millis(DEFAULT_FRAME_MS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source.  Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("ADVICE_MODEL").unwrap_or(defaults.model),
            endpoint: get("ADVICE_ENDPOINT")
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            language: get("COMMANDER_LANGUAGE").unwrap_or(defaults.language),
            advice_timeout: Duration::from_secs(read_u64(
                "ADVICE_TIMEOUT_SECS",
                get("ADVICE_TIMEOUT_SECS"),
                DEFAULT_ADVICE_TIMEOUT_SECS,
            )),
            frame: Duration::from_millis(read_u64("FRAME_MS", get("FRAME_MS"), DEFAULT_FRAME_MS)),
            log_file: get("SKY_GUARDIAN_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

fn read_u64(name: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        None => default,
        Some(raw) => match raw.parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!("{} has invalid value {:?}; using {}", name, raw, default);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_default() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.frame, Duration::from_millis(16));
    }

    #[test]
    fn test_gemini_key_wins_over_generic_key() {
        let config = config_from(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]);
        assert_eq!(config.api_key.as_deref(), Some("gemini"));

        let config = config_from(&[("API_KEY", "generic")]);
        assert_eq!(config.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("FRAME_MS", "fast"), ("ADVICE_TIMEOUT_SECS", "0")]);
        assert_eq!(config.frame, Duration::from_millis(DEFAULT_FRAME_MS));
        assert_eq!(
            config.advice_timeout,
            Duration::from_secs(DEFAULT_ADVICE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = config_from(&[("ADVICE_ENDPOINT", "http://localhost:9000/v1/")]);
        assert_eq!(config.endpoint, "http://localhost:9000/v1");
    }
}
