// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod sync_store;

// Re-export.
pub use sync_store::*;
