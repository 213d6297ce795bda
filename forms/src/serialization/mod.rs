// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Conversion between the flat [`crate::FieldValues`] of a form and the nested JSON data
//! model it edits.

// Attach sources.
pub mod field_codec;
pub mod form_serializer;

// Re-export.
pub use field_codec::*;
pub use form_serializer::*;
