//! Logger factory: the explicit configuration object behind `get_logger`.

use crate::logger::Logger;
use crate::noisy::LevelTable;
use cwlog_adapters::{Pipeline, StdoutLogSink};
use cwlog_config::ValidatedLoggingConfig;
use cwlog_ports::LogSink;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// State shared by a factory and every logger it hands out.
pub(crate) struct Shared {
    pub(crate) pipeline: Pipeline,
    pub(crate) sink: Arc<dyn LogSink>,
    pub(crate) levels: LevelTable,
    pub(crate) config: ValidatedLoggingConfig,
}

/// Owns the pipeline, the sink and the level table, and caches one
/// [`Logger`] per name. Cloning is cheap and shares the cache.
#[derive(Clone)]
pub struct LoggerFactory {
    shared: Arc<Shared>,
    cache: Arc<RwLock<HashMap<String, Logger>>>,
}

impl LoggerFactory {
    /// Standard pipeline for `config`, writing to stdout.
    #[must_use]
    pub fn new(config: ValidatedLoggingConfig) -> Self {
        Self::with_sink(config, Arc::new(StdoutLogSink))
    }

    /// Standard pipeline for `config`, writing to `sink`.
    #[must_use]
    pub fn with_sink(config: ValidatedLoggingConfig, sink: Arc<dyn LogSink>) -> Self {
        let pipeline = Pipeline::standard(&config);
        Self::with_pipeline(config, pipeline, sink)
    }

    /// Custom pipeline; `config` still supplies the level table.
    #[must_use]
    pub fn with_pipeline(
        config: ValidatedLoggingConfig,
        pipeline: Pipeline,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        let levels = LevelTable::from_config(&config);
        Self {
            shared: Arc::new(Shared {
                pipeline,
                sink,
                levels,
                config,
            }),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Logger for `name`, created on first use.
    pub fn get_logger(&self, name: &str) -> Logger {
        if let Some(logger) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return logger.clone();
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(name.to_string())
            .or_insert_with(|| {
                let min_level = self.shared.levels.level_for(name);
                Logger::new(name, min_level, Arc::clone(&self.shared))
            })
            .clone()
    }

    /// The configuration this factory was built from.
    #[must_use]
    pub fn config(&self) -> &ValidatedLoggingConfig {
        &self.shared.config
    }

    /// The processor chain.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.shared.pipeline
    }

    /// Resolved per-logger levels.
    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.shared.levels
    }

    /// Number of cached loggers.
    #[must_use]
    pub fn cached_loggers(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoggerFactory")
            .field("pipeline", &self.shared.pipeline)
            .field("levels", &self.shared.levels)
            .field("cached_loggers", &self.cached_loggers())
            .finish_non_exhaustive()
    }
}
