// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fatal (programmer / configuration) errors. User input problems are never reported
//! here, they are messages in the form's error map. See [`crate::validate_fields`].

/// Convenience type alias for results that can fail with a [`FormError`].
pub type FormResult<T> = Result<T, FormError>;

#[derive(thiserror::Error, Debug, miette::Diagnostic, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("🌐 Missing required locale resource: '{key}'")]
    #[diagnostic(
        code(r3bl_forms::missing_locale_resource),
        help("Add the key to the string resource table before creating the locale context")
    )]
    MissingLocaleResource { key: String },

    #[error("🌐 Locale resource '{key}' has an unusable value '{value}': {reason}")]
    #[diagnostic(code(r3bl_forms::invalid_locale_resource))]
    InvalidLocaleResource {
        key: String,
        value: String,
        reason: String,
    },

    #[error("📋 Could not parse field catalogue: {reason}")]
    #[diagnostic(code(r3bl_forms::invalid_field_catalogue))]
    InvalidFieldCatalogue { reason: String },

    #[error("📋 Unrecognized data type: '{name}'")]
    #[diagnostic(
        code(r3bl_forms::unknown_data_type),
        help("Valid data types are listed in `DataType`")
    )]
    UnknownDataType { name: String },

    #[error("🔍 No field definition for field: '{field_name}'")]
    #[diagnostic(code(r3bl_forms::unknown_field))]
    UnknownField { field_name: String },

    #[error("🧩 Field '{field_name}' of type {data_type} can't hold value {value}")]
    #[diagnostic(code(r3bl_forms::value_type_mismatch))]
    ValueTypeMismatch {
        field_name: String,
        data_type: String,
        value: String,
    },

    #[error("📏 Index {index} is out of bounds for list of length {len}")]
    #[diagnostic(code(r3bl_forms::index_out_of_bounds))]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("📥 Load requires a value for every field, missing: {missing:?}")]
    #[diagnostic(
        code(r3bl_forms::incomplete_values),
        help("Use SetValues for partial updates")
    )]
    IncompleteValues { missing: Vec<String> },
}

impl FormError {
    /// Log the error at `error` level and hand it back, so it can be used inline:
    /// `return Err(FormError::UnknownField { .. }.logged())`.
    #[must_use]
    pub fn logged(self) -> Self {
        // % is Display, ? is Debug.
        tracing::error!(message = "💥 form engine misconfiguration", error = %self);
        self
    }
}
