// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod data_type;
pub mod field_catalogue;
pub mod field_definition;
pub mod field_value;

// Re-export.
pub use data_type::*;
pub use field_definition::*;
pub use field_value::*;
