//! Runtime configuration from `TETRIS_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TETRIS_SEED` | random | piece sequence seed |
//! | `TETRIS_TICK_MS` | 16 | control loop period, clamped to 1..=100 |
//! | `TETRIS_LOG_PATH` | unset | JSON-lines event log file |
//! | `TETRIS_BANNER_MS` | 2000 | how long the GAME OVER banner stays up |
//!
//! Unparsable values fall back to the default.

use std::env;
use std::path::PathBuf;

use crate::types::TICK_MS;

pub const DEFAULT_BANNER_MS: u32 = 2000;
const TICK_MS_RANGE: (u32, u32) = (1, 100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u64,
    pub tick_ms: u32,
    pub log_path: Option<PathBuf>,
    pub banner_ms: u32,
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let seed = parsed("TETRIS_SEED").unwrap_or_else(rand::random);

        let tick_ms = parsed("TETRIS_TICK_MS")
            .map(|v| v.clamp(TICK_MS_RANGE.0 as u64, TICK_MS_RANGE.1 as u64) as u32)
            .unwrap_or(TICK_MS);

        let banner_ms = parsed("TETRIS_BANNER_MS")
            .map(|v| v.min(u32::MAX as u64) as u32)
            .unwrap_or(DEFAULT_BANNER_MS);

        let log_path = lookup("TETRIS_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            seed,
            tick_ms,
            log_path,
            banner_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GameConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GameConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.tick_ms, TICK_MS);
        assert_eq!(cfg.banner_ms, DEFAULT_BANNER_MS);
        assert_eq!(cfg.log_path, None);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_TICK_MS", " 20 "),
            ("TETRIS_LOG_PATH", "/tmp/tetris.jsonl"),
            ("TETRIS_BANNER_MS", "500"),
        ]);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.tick_ms, 20);
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/tetris.jsonl")));
        assert_eq!(cfg.banner_ms, 500);
    }

    #[test]
    fn tick_is_clamped() {
        assert_eq!(config(&[("TETRIS_TICK_MS", "0")]).tick_ms, 1);
        assert_eq!(config(&[("TETRIS_TICK_MS", "5000")]).tick_ms, 100);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config(&[
            ("TETRIS_TICK_MS", "fast"),
            ("TETRIS_BANNER_MS", "-1"),
            ("TETRIS_LOG_PATH", "   "),
        ]);
        assert_eq!(cfg.tick_ms, TICK_MS);
        assert_eq!(cfg.banner_ms, DEFAULT_BANNER_MS);
        assert_eq!(cfg.log_path, None);
    }
}
