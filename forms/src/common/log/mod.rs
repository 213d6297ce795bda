// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod logging_config;
pub mod tracing_init;

// Re-export.
pub use logging_config::*;
pub use tracing_init::*;
