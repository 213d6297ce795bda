// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Where the fmt layer writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPreference {
    Stdout,
    #[default]
    Stderr,
}

/// Configure the tracing subscriber that hosts (and tests) can install to see what the
/// reducers and the store are doing. The library itself only emits events, it never
/// installs a subscriber on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level_filter: LevelFilter,
    pub display_preference: DisplayPreference,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            display_preference: DisplayPreference::default(),
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn new(level_filter: LevelFilter, display_preference: DisplayPreference) -> Self {
        Self {
            level_filter,
            display_preference,
        }
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}
