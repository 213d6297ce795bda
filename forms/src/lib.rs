// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_forms
//!
//! Locale aware form state, validation, and serialization engine. It backs the data
//! entry editors of an authoring tool, and keeps three concerns apart that usually end
//! up tangled in UI code:
//!
//! 1. A declarative, typed description of each field: [`FieldDefinition`], tagged by
//!    [`DataType`].
//! 2. Validation of user entered values against that description: [`validate_fields`]
//!    and [`validate_field`].
//! 3. Bidirectional conversion between form values and an arbitrary nested JSON data
//!    model: [`deserialize`] and [`serialize`].
//!
//! All numeric, date, time, and currency parsing and formatting goes through the
//! [`LocaleFormatter`], which reads its delimiters, patterns, and precision from a
//! [`StringResources`] table held by a [`LocaleContext`]. Nothing is hardcoded to a
//! culture.
//!
//! # State containers
//!
//! Three reducers drive the editors. Each one is a pure function from
//! `(&state, &action)` to a new state, and each can be hosted in a [`Store`] that
//! publishes new snapshots to its subscribers.
//!
//! | State               | Actions              | Reducer                |
//! |---------------------|----------------------|------------------------|
//! | [`FormDataState`]   | [`FormDataAction`]   | [`form_data_reducer`]  |
//! | [`FormModeState`]   | [`FormModeAction`]   | [`form_mode_reducer`]  |
//! | [`ListDataState`]   | [`ListDataAction`]   | [`list_data_reducer`]  |
//!
//! ```
//! use r3bl_forms::{FieldDefinition, FieldDefinitions, FieldKind, FieldValue,
//!                  FormDataAction, FormDataState, LocaleContext, StringTable};
//!
//! let locale = LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap();
//!
//! let mut field_definitions = FieldDefinitions::new();
//! field_definitions.insert(
//!     "name".into(),
//!     FieldDefinition::new("Name", FieldKind::text()).required(),
//! );
//!
//! let state = FormDataState::try_new(field_definitions, locale, false).unwrap();
//! assert!(!state.is_valid);
//!
//! let state = state
//!     .reduce(&FormDataAction::set_value("name", FieldValue::text("Ada")))
//!     .unwrap();
//! assert!(state.is_valid);
//! assert!(state.is_changed);
//! ```
//!
//! # Errors
//!
//! Bad user input is never an error: it shows up as a message in the form's error map.
//! Misconfiguration (a missing locale key, an unknown data type in a field catalogue, a
//! value that can't belong to its field) is reported as a [`FormError`] at the boundary
//! where it is detected.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod common;
pub mod field;
pub mod locale;
pub mod serialization;
pub mod state;
pub mod store;
pub mod validation;

// Re-export.
pub use common::*;
pub use field::*;
pub use locale::*;
pub use serialization::*;
pub use state::*;
pub use store::*;
pub use validation::*;
