// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The three reducers that drive a form editor. Each one is pure, and can be hosted in a
//! [`crate::Store`].

// Attach sources.
pub mod form_data;
pub mod form_mode;
pub mod list_data;

// Re-export.
pub use form_data::*;
pub use form_mode::*;
pub use list_data::*;
