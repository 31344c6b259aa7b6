//! Per-logger minimum levels.
//!
//! Logger names are hierarchical on `::` and `.`: `hyper::client::pool`
//! and `botocore.credentials` inherit the levels of `hyper` and `botocore`.

use cwlog_config::LoggingConfig;
use cwlog_domain::LogLevel;

/// Resolves the effective minimum level for a logger name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    default: LogLevel,
    overrides: Vec<(String, LogLevel)>,
    noisy: Vec<(String, LogLevel)>,
}

impl LevelTable {
    /// Table where every logger uses `default`.
    #[must_use]
    pub const fn new(default: LogLevel) -> Self {
        Self {
            default,
            overrides: Vec::new(),
            noisy: Vec::new(),
        }
    }

    /// Build from the config's minimum level, noisy sources and overrides.
    ///
    /// Noisy sources never become more verbose than the global minimum.
    #[must_use]
    pub fn from_config(config: &LoggingConfig) -> Self {
        let noisy_level = config.noisy_level.max(config.min_level);
        let mut table = Self::new(config.min_level);
        for source in &config.noisy_sources {
            table.noisy.push((source.clone(), noisy_level));
        }
        for (source, level) in &config.level_overrides {
            table.overrides.push((source.clone(), *level));
        }
        table
    }

    /// Set an explicit level for `source` and its descendants.
    #[must_use]
    pub fn with_override(mut self, source: impl Into<String>, level: LogLevel) -> Self {
        let source = source.into();
        self.overrides.retain(|(existing, _)| *existing != source);
        self.overrides.push((source, level));
        self
    }

    /// Level used when nothing matches.
    #[must_use]
    pub const fn default_level(&self) -> LogLevel {
        self.default
    }

    /// Effective minimum level for `name`: the longest matching override,
    /// else the longest matching noisy source, else the default.
    #[must_use]
    pub fn level_for(&self, name: &str) -> LogLevel {
        longest_match(&self.overrides, name)
            .or_else(|| longest_match(&self.noisy, name))
            .unwrap_or(self.default)
    }
}

fn longest_match(entries: &[(String, LogLevel)], name: &str) -> Option<LogLevel> {
    entries
        .iter()
        .filter(|(prefix, _)| is_within(prefix, name))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, level)| *level)
}

fn is_within(prefix: &str, name: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::") || rest.starts_with('.'))
}
