// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod data_path;
pub mod form_error;
pub mod log;

// Re-export.
pub use data_path::*;
pub use form_error::*;
pub use log::*;
