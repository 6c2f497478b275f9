// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Crate-level construction-time configuration.
//!
//! There are no environment variables consumed by the core; every tunable is
//! passed in-process by the host, following the teacher repo's preference
//! for explicit constructor parameters over ambient/env-driven config.

/// Tunables supplied when constructing an [`crate::emulator::Emulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermCoreConfig {
    /// Initial column count of the primary and alternate grids.
    pub initial_cols: usize,
    /// Initial row count of the primary and alternate grids.
    pub initial_rows: usize,
    /// Maximum number of logical lines retained in scrollback. Default 1000.
    pub scrollback_capacity: usize,
    /// Starting capacity of the style-interning LRU. Default 1024.
    pub style_cache_capacity: usize,
    /// Once the style cache has grown beyond this many entries (because
    /// eviction was blocked by live references), a `tracing::warn!` is
    /// emitted once per doubling rather than on every insert.
    pub style_cache_high_water_log_threshold: usize,
}

impl Default for TermCoreConfig {
    fn default() -> Self {
        Self {
            initial_cols: 80,
            initial_rows: 24,
            scrollback_capacity: 1000,
            style_cache_capacity: 1024,
            style_cache_high_water_log_threshold: 4096,
        }
    }
}

impl TermCoreConfig {
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            initial_cols: cols,
            initial_rows: rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scrollback_capacity(mut self, capacity: usize) -> Self {
        self.scrollback_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_style_cache_capacity(mut self, capacity: usize) -> Self {
        self.style_cache_capacity = capacity;
        self
    }
}
