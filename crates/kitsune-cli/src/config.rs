//! Runtime configuration for the console.
//!
//! Everything here is optional and read from environment variables; the
//! persisted user choices (endpoint, colour, sound, save location) live in
//! the settings file instead.

use std::str::FromStr;
use std::time::Duration;

use crate::error::CliError;

/// Runtime knobs for the chat client and autosave.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Deadline for a chat request.
    pub chat_timeout: Duration,
    /// Deadline for the health check that precedes every chat request.
    pub health_timeout: Duration,
    /// `max_tokens` sent with every chat request.
    pub max_tokens: u32,
    /// `temperature` sent with every chat request.
    pub temperature: f64,
    /// Save progress after every this many interactions.
    pub autosave_interval: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            chat_timeout: Duration::from_secs(150),
            health_timeout: Duration::from_secs(5),
            max_tokens: 500,
            temperature: 0.7,
            autosave_interval: 5,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `KITSUNE_CHAT_TIMEOUT_SECS` -- chat deadline (default 150)
    /// - `KITSUNE_HEALTH_TIMEOUT_SECS` -- health check deadline (default 5)
    /// - `KITSUNE_MAX_TOKENS` -- reply length cap (default 500)
    /// - `KITSUNE_TEMPERATURE` -- sampling temperature (default 0.7)
    /// - `KITSUNE_AUTOSAVE_INTERVAL` -- interactions between autosaves (default 5)
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chat_timeout_secs: u64 = parse_var(&lookup, "KITSUNE_CHAT_TIMEOUT_SECS", 150)?;
        let health_timeout_secs: u64 = parse_var(&lookup, "KITSUNE_HEALTH_TIMEOUT_SECS", 5)?;
        let max_tokens: u32 = parse_var(&lookup, "KITSUNE_MAX_TOKENS", 500)?;
        let temperature: f64 = parse_var(&lookup, "KITSUNE_TEMPERATURE", 0.7)?;
        let autosave_interval: u64 = parse_var(&lookup, "KITSUNE_AUTOSAVE_INTERVAL", 5)?;

        if chat_timeout_secs == 0 || health_timeout_secs == 0 {
            return Err(CliError::Config("timeouts must be at least 1 second".to_owned()));
        }
        if autosave_interval == 0 {
            return Err(CliError::Config(
                "invalid KITSUNE_AUTOSAVE_INTERVAL: must be at least 1".to_owned(),
            ));
        }
        if !(0.0..=2.0).contains(&temperature) {
            return Err(CliError::Config(format!(
                "invalid KITSUNE_TEMPERATURE: {temperature} is outside 0.0..=2.0"
            )));
        }

        Ok(Self {
            chat_timeout: Duration::from_secs(chat_timeout_secs),
            health_timeout: Duration::from_secs(health_timeout_secs),
            max_tokens,
            temperature,
            autosave_interval,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CliError::Config(format!("invalid {name}: {e}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = CliConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.chat_timeout, Duration::from_secs(150));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.autosave_interval, 5);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = CliConfig::from_lookup(lookup(&[
            ("KITSUNE_CHAT_TIMEOUT_SECS", "30"),
            ("KITSUNE_MAX_TOKENS", " 128 "),
            ("KITSUNE_AUTOSAVE_INTERVAL", "1"),
        ]))
        .unwrap();
        assert_eq!(config.chat_timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 128);
        assert_eq!(config.autosave_interval, 1);
    }

    #[test]
    fn garbage_is_a_config_error() {
        let err = CliConfig::from_lookup(lookup(&[("KITSUNE_MAX_TOKENS", "lots")]));
        assert!(matches!(err, Err(CliError::Config(msg)) if msg.contains("KITSUNE_MAX_TOKENS")));
    }

    #[test]
    fn zero_autosave_is_rejected() {
        let err = CliConfig::from_lookup(lookup(&[("KITSUNE_AUTOSAVE_INTERVAL", "0")]));
        assert!(matches!(err, Err(CliError::Config(_))));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let err = CliConfig::from_lookup(lookup(&[("KITSUNE_TEMPERATURE", "7.5")]));
        assert!(matches!(err, Err(CliError::Config(_))));
    }
}
