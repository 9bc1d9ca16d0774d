//! Board configuration parsed from environment variables.

use std::str::FromStr;

use canvas::consts::AUTO_FIT_DELAY_MS;
use canvas::doc::BoardStore;
use canvas::engine::EngineCore;

use crate::error::ConfigError;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
pub const DEFAULT_FIND_CANDIDATES: usize = 40;
pub const DEFAULT_FIND_MIN_SIMILARITY: f32 = 0.2;
pub const DEFAULT_AI_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    /// Viewport size used by headless fit computations.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Delay before the first-content auto-fit runs.
    pub auto_fit_delay_ms: u64,
    /// Semantic pre-filter size for `find_notes`.
    pub find_candidates: usize,
    pub find_min_similarity: f32,
    pub ai_max_tokens: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            auto_fit_delay_ms: AUTO_FIT_DELAY_MS,
            find_candidates: DEFAULT_FIND_CANDIDATES,
            find_min_similarity: DEFAULT_FIND_MIN_SIMILARITY,
            ai_max_tokens: DEFAULT_AI_MAX_TOKENS,
        }
    }
}

impl BoardConfig {
    /// Build config from environment variables. Missing values take defaults.
    ///
    /// - `INSIGHTBOARD_VIEWPORT_WIDTH` / `INSIGHTBOARD_VIEWPORT_HEIGHT`: default 1280×800
    /// - `INSIGHTBOARD_AUTO_FIT_DELAY_MS`: default 100
    /// - `AI_FIND_CANDIDATES`: default 40
    /// - `AI_FIND_MIN_SIMILARITY`: default 0.2
    /// - `AI_MAX_TOKENS`: default 4096
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a present value does not parse or a
    /// viewport dimension is not positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BoardConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            viewport_width: env_parse(&lookup, "INSIGHTBOARD_VIEWPORT_WIDTH", defaults.viewport_width)?,
            viewport_height: env_parse(&lookup, "INSIGHTBOARD_VIEWPORT_HEIGHT", defaults.viewport_height)?,
            auto_fit_delay_ms: env_parse(&lookup, "INSIGHTBOARD_AUTO_FIT_DELAY_MS", defaults.auto_fit_delay_ms)?,
            find_candidates: env_parse(&lookup, "AI_FIND_CANDIDATES", defaults.find_candidates)?,
            find_min_similarity: env_parse(&lookup, "AI_FIND_MIN_SIMILARITY", defaults.find_min_similarity)?,
            ai_max_tokens: env_parse(&lookup, "AI_MAX_TOKENS", defaults.ai_max_tokens)?,
        };
        ensure_positive("INSIGHTBOARD_VIEWPORT_WIDTH", config.viewport_width)?;
        ensure_positive("INSIGHTBOARD_VIEWPORT_HEIGHT", config.viewport_height)?;
        Ok(config)
    }

    /// Engine over `store` sized to the configured viewport and auto-fit delay.
    #[must_use]
    pub fn engine<S: BoardStore>(&self, store: S) -> EngineCore<S> {
        let mut core = EngineCore::with_store(store);
        core.set_viewport_size(self.viewport_width, self.viewport_height);
        core.set_auto_fit_delay(self.auto_fit_delay_ms);
        core
    }
}

fn env_parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn ensure_positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() { Ok(()) } else { Err(ConfigError::NotPositive { key, value }) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
