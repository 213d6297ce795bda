// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod field_validator;
pub mod validation_message;

// Re-export.
pub use field_validator::*;
pub use validation_message::*;
