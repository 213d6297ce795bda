// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::str::FromStr;

use crate::{FormError, FormResult};

/// Tag of a field definition. Exactly one per [`crate::FieldDefinition`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::AsRefStr,
)]
pub enum DataType {
    Text,
    RichText,
    Dropdown,
    Date,
    Time,
    DateTime,
    Integer,
    NullableInteger,
    Float,
    NullableFloat,
    Boolean,
    NullableBoolean,
    List,
}

impl DataType {
    /// # Errors
    ///
    /// [`FormError::UnknownDataType`] if `name` is not one of the variants (exact,
    /// case sensitive match).
    pub fn try_parse(name: &str) -> FormResult<Self> {
        DataType::from_str(name).map_err(|_| {
            FormError::UnknownDataType {
                name: name.to_string(),
            }
            .logged()
        })
    }

    /// The serializer writes these into the data model even when their encoded value is
    /// empty. Every other type is left out of the model when empty.
    #[must_use]
    pub fn is_always_serialized(self) -> bool {
        matches!(
            self,
            DataType::Text
                | DataType::Dropdown
                | DataType::NullableBoolean
                | DataType::NullableFloat
                | DataType::NullableInteger
        )
    }
}
