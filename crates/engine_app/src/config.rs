//! Host configuration.
//!
//! Everything can be overridden from the environment:
//!
//! | Variable           | Default | Meaning                                    |
//! |--------------------|---------|--------------------------------------------|
//! | `ENGINE_TICK_RATE` | `60`    | Frames per second.                         |
//! | `ENGINE_MAX_TICKS` | `0`     | Frames to run before exiting (0 = forever). |
//! | `ENGINE_SNAPSHOT`  | unset   | JSON file the active set is restored from and saved to. |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const TICK_RATE_ENV: &str = "ENGINE_TICK_RATE";
pub const MAX_TICKS_ENV: &str = "ENGINE_MAX_TICKS";
pub const SNAPSHOT_ENV: &str = "ENGINE_SNAPSHOT";

/// Tick length used when the configured rate has no usable period.
pub const MIN_TICK_DURATION: Duration = Duration::from_millis(1);

/// Non-zero length of one tick at `tick_rate`, if it fits in a [`Duration`].
fn tick_period(tick_rate: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(1.0 / tick_rate)
        .ok()
        .filter(|period| !period.is_zero())
}

/// Configuration for the host frame loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Where the active set is restored from on start and saved to on exit.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            snapshot_path: None,
        }
    }
}

impl TickConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a variable is set but cannot be parsed, or the tick rate is
    /// not a positive number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`TickConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(TICK_RATE_ENV) {
            config.tick_rate = raw
                .trim()
                .parse()
                .with_context(|| format!("{TICK_RATE_ENV} is not a number: {raw:?}"))?;
        }
        if !(config.tick_rate.is_finite() && config.tick_rate > 0.0) {
            bail!("{TICK_RATE_ENV} must be positive, got {}", config.tick_rate);
        }
        if tick_period(config.tick_rate).is_none() {
            bail!(
                "{TICK_RATE_ENV} of {} does not give a usable tick length",
                config.tick_rate
            );
        }

        if let Some(raw) = lookup(MAX_TICKS_ENV) {
            config.max_ticks = raw
                .trim()
                .parse()
                .with_context(|| format!("{MAX_TICKS_ENV} is not an unsigned integer: {raw:?}"))?;
        }

        config.snapshot_path = lookup(SNAPSHOT_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// Wall-clock length of one tick.
    ///
    /// Rates that [`TickConfig::from_lookup`] would reject fall back to
    /// [`MIN_TICK_DURATION`].
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        tick_period(self.tick_rate).unwrap_or(MIN_TICK_DURATION)
    }

    /// Simulated milliseconds that pass per tick. Never zero.
    #[must_use]
    pub fn tick_ms(&self) -> u64 {
        ((1000.0 / self.tick_rate).round() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = TickConfig::from_lookup(lookup(&[])).unwrap();
        assert!((config.tick_rate - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.max_ticks, 0);
        assert!(config.snapshot_path.is_none());
        assert_eq!(config.tick_ms(), 17);
    }

    #[test]
    fn test_overrides() {
        let config = TickConfig::from_lookup(lookup(&[
            (TICK_RATE_ENV, "100"),
            (MAX_TICKS_ENV, " 25 "),
            (SNAPSHOT_ENV, "/tmp/active.json"),
        ]))
        .unwrap();
        assert_eq!(config.tick_ms(), 10);
        assert_eq!(config.max_ticks, 25);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/active.json")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(TickConfig::from_lookup(lookup(&[(TICK_RATE_ENV, "fast")])).is_err());
        assert!(TickConfig::from_lookup(lookup(&[(TICK_RATE_ENV, "0")])).is_err());
        assert!(TickConfig::from_lookup(lookup(&[(MAX_TICKS_ENV, "-1")])).is_err());
        assert!(TickConfig::from_lookup(lookup(&[(TICK_RATE_ENV, "1e10")])).is_err());
        assert!(TickConfig::from_lookup(lookup(&[(TICK_RATE_ENV, "1e-300")])).is_err());
    }

    #[test]
    fn test_tick_duration_never_panics() {
        for tick_rate in [1e10, 1e-300, f64::NAN, -5.0] {
            let config = TickConfig {
                tick_rate,
                ..TickConfig::default()
            };
            assert_eq!(config.tick_duration(), MIN_TICK_DURATION);
        }
        assert_eq!(
            TickConfig::default().tick_duration(),
            Duration::from_secs_f64(1.0 / 60.0)
        );
    }

    #[test]
    fn test_tick_ms_never_zero() {
        let config = TickConfig {
            tick_rate: 10_000.0,
            ..TickConfig::default()
        };
        assert_eq!(config.tick_ms(), 1);
    }
}
