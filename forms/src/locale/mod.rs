// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Locale context, string resources, and the parser / formatter built on them.

// Attach sources.
pub mod date_pattern;
pub mod locale_context;
pub mod locale_formatter;
pub mod number_format;
pub mod string_resources;

// Re-export.
pub use date_pattern::*;
pub use locale_context::*;
pub use locale_formatter::*;
pub use number_format::*;
pub use string_resources::*;
