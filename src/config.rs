use crate::duplicates::DEFAULT_DUPLICATE_THRESHOLD;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Company-name similarity at which leads count as duplicates.
    pub duplicate_threshold: f64,
    /// Maximum accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Requests replenished per second, per client IP.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            max_body_bytes: 5 * 1024 * 1024,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!("Duplicate threshold: {}", config.duplicate_threshold);
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );

        Ok(config)
    }

    /// Interval between replenished rate-limit permits, in milliseconds.
    ///
    /// Rates above 1000/s are capped at one permit per millisecond.
    pub fn rate_limit_interval_ms(&self) -> u64 {
        1000u64
            .checked_div(self.rate_limit_per_second)
            .unwrap_or(1000)
            .max(1)
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables take their defaults; set but malformed ones
    /// are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
                None => defaults.port,
            },
            duplicate_threshold: match var("DUPLICATE_THRESHOLD") {
                Some(threshold) => threshold
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("DUPLICATE_THRESHOLD must be a number"))
                    .and_then(|threshold| {
                        if !(0.0..=1.0).contains(&threshold) {
                            anyhow::bail!("DUPLICATE_THRESHOLD must be between 0 and 1");
                        }
                        Ok(threshold)
                    })?,
                None => defaults.duplicate_threshold,
            },
            max_body_bytes: match var("MAX_BODY_BYTES") {
                Some(bytes) => bytes
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("MAX_BODY_BYTES must be a positive integer"))
                    .and_then(|bytes| {
                        if bytes == 0 {
                            anyhow::bail!("MAX_BODY_BYTES cannot be zero");
                        }
                        Ok(bytes)
                    })?,
                None => defaults.max_body_bytes,
            },
            rate_limit_per_second: match var("RATE_LIMIT_PER_SECOND") {
                Some(rate) => rate
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| {
                        anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive integer")
                    })
                    .and_then(|rate| {
                        if rate == 0 {
                            anyhow::bail!("RATE_LIMIT_PER_SECOND cannot be zero");
                        }
                        Ok(rate)
                    })?,
                None => defaults.rate_limit_per_second,
            },
            rate_limit_burst: match var("RATE_LIMIT_BURST") {
                Some(burst) => burst
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive integer"))
                    .and_then(|burst| {
                        if burst == 0 {
                            anyhow::bail!("RATE_LIMIT_BURST cannot be zero");
                        }
                        Ok(burst)
                    })?,
                None => defaults.rate_limit_burst,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.duplicate_threshold, 0.85);
        assert_eq!(config.max_body_bytes, 5 * 1024 * 1024);
        assert_eq!(config.rate_limit_per_second, 10);
        assert_eq!(config.rate_limit_burst, 20);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DUPLICATE_THRESHOLD", "0.9"),
            ("RATE_LIMIT_BURST", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.duplicate_threshold, 0.9);
        assert_eq!(config.rate_limit_burst, 5);
    }

    #[test]
    fn test_rate_limit_interval() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rate_limit_interval_ms(), 100);

        let config = Config::from_lookup(lookup(&[("RATE_LIMIT_PER_SECOND", "1")])).unwrap();
        assert_eq!(config.rate_limit_interval_ms(), 1000);

        let config = Config::from_lookup(lookup(&[("RATE_LIMIT_PER_SECOND", "5000")])).unwrap();
        assert_eq!(config.rate_limit_interval_ms(), 1);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DUPLICATE_THRESHOLD", "1.5")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MAX_BODY_BYTES", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("RATE_LIMIT_PER_SECOND", "-1")])).is_err());
    }
}
