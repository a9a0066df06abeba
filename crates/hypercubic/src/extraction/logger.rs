//! Extraction progress logging.
//!
//! Events are emitted through `tracing`; install any subscriber to see them.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// How much an extraction run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Only unexpected situations, such as the coverage fallback.
    Warning,
    /// Start and end of the run.
    Info,
    /// Per-level frontier sizes and merges.
    Debug,
}

/// Structured logger of one extraction run.
#[derive(Debug)]
pub struct ExtractionLogger {
    verbosity: Verbosity,
    engine: &'static str,
    started: Option<Instant>,
}

impl ExtractionLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            engine: "",
            started: None,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn start_extraction(&mut self, engine: &'static str, n_levels: usize, n_samples: usize) {
        self.engine = engine;
        self.started = Some(Instant::now());
        if self.verbosity >= Verbosity::Info {
            tracing::info!(engine, n_levels, n_samples, "starting extraction");
        }
    }

    pub fn log_level(&self, level: usize, frontier: usize, accepted: usize) {
        if self.verbosity >= Verbosity::Debug {
            tracing::debug!(engine = self.engine, level, frontier, accepted, "level done");
        }
    }

    pub fn log_merges(&self, level: usize, before: usize, after: usize) {
        if self.verbosity >= Verbosity::Debug && before != after {
            tracing::debug!(engine = self.engine, level, before, after, "merged adjacent cubes");
        }
    }

    pub fn log_fallback(&self, uncovered: usize) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!(
                engine = self.engine,
                uncovered,
                "cubes leave samples uncovered, appending the surrounding cube"
            );
        }
    }

    pub fn finish_extraction(&self, n_cubes: usize) {
        if self.verbosity >= Verbosity::Info {
            let elapsed_ms = self.started.map_or(0, |t| t.elapsed().as_millis() as u64);
            tracing::info!(engine = self.engine, n_cubes, elapsed_ms, "extraction finished");
        }
    }
}
