// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt, sync::Arc};

use crate::{EditedFields, FieldDefinitions, FieldErrors, FieldValue, FieldValues,
            FormError, FormResult, LocaleContext, Store, check_values, validate_fields};

pub type FormDataStore = Store<FormDataState, FormDataAction>;

/// Values, errors, and visit flags of one form. Every map is keyed by the field names of
/// `field_definitions`, in the same order.
///
/// `errors` holds the current validation result of every field. `errors_to_show` is the
/// subset the user should see: a field's error is shown only once the field has been
/// edited (visited), or after [`FormDataAction::ShowAllErrors`].
#[derive(Clone)]
pub struct FormDataState {
    pub values: FieldValues,
    pub original_values: FieldValues,
    pub errors: FieldErrors,
    pub edited_fields: EditedFields,
    pub errors_to_show: FieldErrors,
    /// No field has an error.
    pub is_valid: bool,
    /// Some value was changed since the last Initialize / Load / Restore. Once set, it
    /// stays set even if the user types the original value back.
    pub is_changed: bool,
    pub field_definitions: Arc<FieldDefinitions>,
    pub locale: LocaleContext,
    /// On [`FormDataAction::SetValues`], validate only the fields that were set instead
    /// of the whole form. Cross field rules are then the caller's concern.
    pub only_validate_changed_fields: bool,
}

#[derive(Clone, Debug, strum_macros::AsRefStr)]
pub enum FormDataAction {
    Initialize {
        field_definitions: Arc<FieldDefinitions>,
        locale: LocaleContext,
        only_validate_changed_fields: bool,
    },
    /// Merge into the current values.
    SetValues(FieldValues),
    ShowAllErrors,
    HideAllErrors,
    /// Replace the error map, eg: with errors computed by a server. Fields not named are
    /// valid afterwards.
    SetErrors(FieldErrors),
    /// The user left this field.
    SetEditedField(String),
    /// Replace values and original values with a complete record.
    Load(FieldValues),
    /// Back to the original values.
    Restore,
}

impl FormDataAction {
    pub fn set_value(field_name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let mut values = FieldValues::new();
        values.insert(field_name.into(), value.into());
        FormDataAction::SetValues(values)
    }

    pub fn set_edited_field(field_name: impl Into<String>) -> Self {
        FormDataAction::SetEditedField(field_name.into())
    }
}

impl FormDataState {
    /// A new form, in the state [`FormDataAction::Initialize`] produces.
    ///
    /// # Errors
    ///
    /// [`FormError::ValueTypeMismatch`] if a field's initial value can't belong to it.
    pub fn try_new(
        field_definitions: FieldDefinitions,
        locale: LocaleContext,
        only_validate_changed_fields: bool,
    ) -> FormResult<Self> {
        Self::initialize(
            Arc::new(field_definitions),
            locale,
            only_validate_changed_fields,
        )
    }

    fn initialize(
        field_definitions: Arc<FieldDefinitions>,
        locale: LocaleContext,
        only_validate_changed_fields: bool,
    ) -> FormResult<Self> {
        let mut values = FieldValues::with_capacity(field_definitions.len());
        for (field_name, definition) in field_definitions.iter() {
            let value = definition.resolved_initial_value();
            definition.check_value(field_name, &value)?;
            values.insert(field_name.clone(), value);
        }

        let errors = validate_fields(&values, &field_definitions, None, &locale);

        Ok(Self {
            original_values: values.clone(),
            values,
            errors,
            edited_fields: all_edited(&field_definitions, false),
            errors_to_show: FieldErrors::new(),
            is_valid: false,
            is_changed: false,
            field_definitions,
            locale,
            only_validate_changed_fields,
        }
        .with_derived_flags())
    }

    /// Pure transition, `self` is left untouched.
    ///
    /// # Errors
    ///
    /// - [`FormError::UnknownField`] if an action names an undeclared field.
    /// - [`FormError::ValueTypeMismatch`] if a value can't belong to its field.
    /// - [`FormError::IncompleteValues`] if [`FormDataAction::Load`] misses fields.
    pub fn reduce(&self, action: &FormDataAction) -> FormResult<Self> {
        // % is Display, ? is Debug.
        tracing::debug!(message = "📝 form data", action = %action.as_ref());

        let new_state = match action {
            FormDataAction::Initialize {
                field_definitions,
                locale,
                only_validate_changed_fields,
            } => Self::initialize(
                field_definitions.clone(),
                locale.clone(),
                *only_validate_changed_fields,
            )?,
            FormDataAction::SetValues(new_values) => self.set_values(new_values)?,
            FormDataAction::ShowAllErrors => Self {
                edited_fields: all_edited(&self.field_definitions, true),
                ..self.clone()
            }
            .with_derived_flags(),
            FormDataAction::HideAllErrors => Self {
                edited_fields: all_edited(&self.field_definitions, false),
                ..self.clone()
            }
            .with_derived_flags(),
            FormDataAction::SetErrors(new_errors) => self.set_errors(new_errors)?,
            FormDataAction::SetEditedField(field_name) => {
                self.set_edited_field(field_name)?
            }
            FormDataAction::Load(new_values) => self.load(new_values)?,
            FormDataAction::Restore => self.reset_to(self.original_values.clone()),
        };

        tracing::debug!(
            message = "📝 form data reduced",
            is_valid = %new_state.is_valid,
            is_changed = %new_state.is_changed
        );

        Ok(new_state)
    }

    fn set_values(&self, new_values: &FieldValues) -> FormResult<Self> {
        check_values(new_values, &self.field_definitions)?;

        let is_changed = self.is_changed
            || new_values
                .iter()
                .any(|(field_name, value)| self.values.get(field_name) != Some(value));

        let mut values = self.values.clone();
        for (field_name, value) in new_values {
            values.insert(field_name.clone(), value.clone());
        }

        let errors = if self.only_validate_changed_fields {
            let touched: Vec<String> = new_values.keys().cloned().collect();
            let mut errors = self.errors.clone();
            errors.extend(validate_fields(
                &values,
                &self.field_definitions,
                Some(&touched),
                &self.locale,
            ));
            errors
        } else {
            validate_fields(&values, &self.field_definitions, None, &self.locale)
        };

        Ok(Self {
            values,
            errors,
            is_changed,
            ..self.clone()
        }
        .with_derived_flags())
    }

    fn set_errors(&self, new_errors: &FieldErrors) -> FormResult<Self> {
        if let Some(field_name) = new_errors
            .keys()
            .find(|it| !self.field_definitions.contains_key(*it))
        {
            return Err(FormError::UnknownField {
                field_name: field_name.clone(),
            }
            .logged());
        }

        let errors = self
            .field_definitions
            .keys()
            .map(|field_name| {
                let error = new_errors.get(field_name).cloned().flatten();
                (field_name.clone(), error)
            })
            .collect();

        Ok(Self {
            errors,
            ..self.clone()
        }
        .with_derived_flags())
    }

    fn set_edited_field(&self, field_name: &str) -> FormResult<Self> {
        if !self.field_definitions.contains_key(field_name) {
            return Err(FormError::UnknownField {
                field_name: field_name.to_string(),
            }
            .logged());
        }

        let mut edited_fields = self.edited_fields.clone();
        edited_fields.insert(field_name.to_string(), true);
        let mut errors_to_show = self.errors_to_show.clone();
        errors_to_show.insert(
            field_name.to_string(),
            self.errors.get(field_name).cloned().flatten(),
        );

        Ok(Self {
            edited_fields,
            errors_to_show,
            ..self.clone()
        })
    }

    fn load(&self, new_values: &FieldValues) -> FormResult<Self> {
        let missing: Vec<String> = self
            .field_definitions
            .keys()
            .filter(|it| !new_values.contains_key(*it))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(FormError::IncompleteValues { missing }.logged());
        }
        check_values(new_values, &self.field_definitions)?;

        // Keep the declaration order.
        let values: FieldValues = self
            .field_definitions
            .keys()
            .filter_map(|it| new_values.get(it).map(|value| (it.clone(), value.clone())))
            .collect();

        Ok(Self {
            original_values: values.clone(),
            ..self.reset_to(values)
        })
    }

    fn reset_to(&self, values: FieldValues) -> Self {
        let errors = validate_fields(&values, &self.field_definitions, None, &self.locale);
        Self {
            values,
            errors,
            edited_fields: all_edited(&self.field_definitions, false),
            is_changed: false,
            ..self.clone()
        }
        .with_derived_flags()
    }

    /// Recompute `errors_to_show` and `is_valid` from `errors` and `edited_fields`.
    fn with_derived_flags(mut self) -> Self {
        self.errors_to_show = self
            .field_definitions
            .keys()
            .map(|field_name| {
                let is_edited = self.edited_fields.get(field_name).copied().unwrap_or(false);
                let error = if is_edited {
                    self.errors.get(field_name).cloned().flatten()
                } else {
                    None
                };
                (field_name.clone(), error)
            })
            .collect();
        self.is_valid = self.errors.values().all(Option::is_none);
        self
    }
}

// Queries.
impl FormDataState {
    /// The message to display under the field, if any.
    #[must_use]
    pub fn error_to_show(&self, field_name: &str) -> Option<&str> {
        self.errors_to_show.get(field_name)?.as_deref()
    }

    #[must_use]
    pub fn value(&self, field_name: &str) -> Option<&FieldValue> { self.values.get(field_name) }

    #[must_use]
    pub fn fields_with_errors(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(_, error)| error.is_some())
            .map(|(field_name, _)| field_name.as_str())
            .collect()
    }

    /// Fields whose value differs from the original value right now.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(field_name, value)| self.original_values.get(*field_name) != Some(*value))
            .map(|(field_name, _)| field_name.as_str())
            .collect()
    }
}

/// [`FormDataState::reduce`] in the shape a [`Store`] expects.
///
/// # Errors
///
/// See [`FormDataState::reduce`].
pub fn form_data_reducer(
    state: &FormDataState,
    action: &FormDataAction,
) -> FormResult<FormDataState> {
    state.reduce(action)
}

fn all_edited(field_definitions: &FieldDefinitions, is_edited: bool) -> EditedFields {
    field_definitions
        .keys()
        .map(|field_name| (field_name.clone(), is_edited))
        .collect()
}

impl PartialEq for FormDataState {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
            && self.original_values == other.original_values
            && self.errors == other.errors
            && self.edited_fields == other.edited_fields
            && self.errors_to_show == other.errors_to_show
            && self.is_valid == other.is_valid
            && self.is_changed == other.is_changed
            && self.only_validate_changed_fields == other.only_validate_changed_fields
            && Arc::ptr_eq(&self.field_definitions, &other.field_definitions)
            && self.locale == other.locale
    }
}

impl fmt::Debug for FormDataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDataState")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("edited_fields", &self.edited_fields)
            .field("is_valid", &self.is_valid)
            .field("is_changed", &self.is_changed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{FieldDefinition, FieldKind, IntegerRules, StringTable, TextRules};

    fn en_us() -> LocaleContext {
        LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap()
    }

    fn definitions() -> FieldDefinitions {
        let mut acc = FieldDefinitions::new();
        acc.insert(
            "name".into(),
            FieldDefinition::new(
                "Name",
                FieldKind::Text(TextRules {
                    max_length: Some(5),
                    ..Default::default()
                }),
            )
            .required(),
        );
        acc.insert(
            "age".into(),
            FieldDefinition::new(
                "Age",
                FieldKind::Integer(IntegerRules {
                    min: Some(18),
                    ..Default::default()
                }),
            ),
        );
        acc.insert("agree".into(), FieldDefinition::new("Agree", FieldKind::Boolean));
        acc
    }

    fn new_state(only_validate_changed_fields: bool) -> FormDataState {
        FormDataState::try_new(definitions(), en_us(), only_validate_changed_fields).unwrap()
    }

    fn assert_errors_to_show_invariant(state: &FormDataState) {
        for (field_name, error) in &state.errors_to_show {
            if error.is_some() {
                assert!(state.edited_fields[field_name], "{field_name} shown but not edited");
            }
        }
    }

    #[test]
    fn test_initialize() {
        let state = new_state(false);
        assert_eq!(state.values["name"], FieldValue::empty_text());
        assert_eq!(state.values["agree"], FieldValue::Boolean(false));
        assert_eq!(state.original_values, state.values);
        assert_eq!(state.errors["name"].as_deref(), Some("Required"));
        assert_eq!(state.errors["age"], None);
        assert!(!state.is_valid);
        assert!(!state.is_changed);
        assert_eq!(state.error_to_show("name"), None);
        assert_eq!(state.fields_with_errors(), vec!["name"]);
        let keys: Vec<&String> = state.errors_to_show.keys().collect();
        assert_eq!(keys, vec!["name", "age", "agree"]);
    }

    #[test]
    fn test_initialize_action_rebuilds_the_form() {
        let state = new_state(false)
            .reduce(&FormDataAction::set_value("name", "Ada"))
            .unwrap();
        let state = state
            .reduce(&FormDataAction::Initialize {
                field_definitions: state.field_definitions.clone(),
                locale: en_us(),
                only_validate_changed_fields: true,
            })
            .unwrap();
        assert_eq!(state.values["name"], FieldValue::empty_text());
        assert!(state.only_validate_changed_fields);
        assert!(!state.is_changed);
    }

    #[test]
    fn test_set_values_revalidates_and_marks_changed() {
        let state = new_state(false);
        let next = state.reduce(&FormDataAction::set_value("name", "Ada")).unwrap();
        assert!(next.is_valid);
        assert!(next.is_changed);
        assert_eq!(next.changed_fields(), vec!["name"]);
        assert_eq!(next.value("name"), Some(&FieldValue::text("Ada")));

        // The old snapshot is untouched.
        assert_eq!(state.values["name"], FieldValue::empty_text());
        assert!(!state.is_changed);
    }

    #[test]
    fn test_is_changed_is_monotonic() {
        let state = new_state(false)
            .reduce(&FormDataAction::set_value("name", "Ada"))
            .unwrap()
            .reduce(&FormDataAction::set_value("name", ""))
            .unwrap();
        assert!(state.is_changed);
        assert!(state.changed_fields().is_empty());
    }

    #[test]
    fn test_setting_the_same_value_is_not_a_change() {
        let state = new_state(false)
            .reduce(&FormDataAction::set_value("agree", false))
            .unwrap();
        assert!(!state.is_changed);
    }

    #[test]
    fn test_only_validate_changed_fields_keeps_other_errors() {
        let mut field_definitions = FieldDefinitions::new();
        field_definitions.insert("a".into(), FieldDefinition::new("A", FieldKind::integer()));
        field_definitions.insert("b".into(), FieldDefinition::new("B", FieldKind::text()));
        let state = FormDataState::try_new(field_definitions, en_us(), true).unwrap();

        let mut server_errors = FieldErrors::new();
        server_errors.insert("b".into(), Some("Already taken".into()));
        let state = state.reduce(&FormDataAction::SetErrors(server_errors)).unwrap();

        let state = state.reduce(&FormDataAction::set_value("a", 1_i64)).unwrap();
        assert_eq!(state.errors["a"], None);
        assert_eq!(state.errors["b"].as_deref(), Some("Already taken"));
        assert!(!state.is_valid);
    }

    #[test]
    fn test_full_validation_clears_foreign_errors() {
        let state = new_state(false);
        let mut server_errors = FieldErrors::new();
        server_errors.insert("age".into(), Some("Server says no".into()));
        let state = state.reduce(&FormDataAction::SetErrors(server_errors)).unwrap();
        assert_eq!(state.errors["name"], None);
        assert_eq!(state.errors["age"].as_deref(), Some("Server says no"));

        let state = state.reduce(&FormDataAction::set_value("agree", true)).unwrap();
        assert_eq!(state.errors["age"], None);
        assert_eq!(state.errors["name"].as_deref(), Some("Required"));
    }

    #[test]
    fn test_edited_fields_control_error_visibility() {
        let state = new_state(false)
            .reduce(&FormDataAction::set_value("age", "12"))
            .unwrap();
        assert_eq!(state.error_to_show("age"), None);
        assert_errors_to_show_invariant(&state);

        let state = state.reduce(&FormDataAction::set_edited_field("age")).unwrap();
        assert_eq!(state.error_to_show("age"), Some("Must be at least 18"));
        assert_eq!(state.error_to_show("name"), None);
        assert_errors_to_show_invariant(&state);

        let state = state.reduce(&FormDataAction::ShowAllErrors).unwrap();
        assert_eq!(state.error_to_show("name"), Some("Required"));
        assert_errors_to_show_invariant(&state);

        let state = state.reduce(&FormDataAction::HideAllErrors).unwrap();
        assert!(state.errors_to_show.values().all(Option::is_none));
        assert!(state.edited_fields.values().all(|it| !it));
        assert!(!state.is_valid);
    }

    #[test]
    fn test_load_replaces_original_values() {
        let mut record = FieldValues::new();
        record.insert("name".into(), FieldValue::text("Grace"));
        record.insert("agree".into(), FieldValue::Boolean(true));
        record.insert("age".into(), FieldValue::Integer(85));

        let state = new_state(false)
            .reduce(&FormDataAction::set_value("name", "x"))
            .unwrap()
            .reduce(&FormDataAction::ShowAllErrors)
            .unwrap()
            .reduce(&FormDataAction::Load(record))
            .unwrap();

        assert_eq!(state.original_values, state.values);
        let keys: Vec<&String> = state.values.keys().collect();
        assert_eq!(keys, vec!["name", "age", "agree"]);
        assert!(!state.is_changed);
        assert!(state.is_valid);
        assert!(state.edited_fields.values().all(|it| !it));
    }

    #[test]
    fn test_load_rejects_partial_values() {
        let mut record = FieldValues::new();
        record.insert("name".into(), FieldValue::text("Grace"));
        let error = new_state(false)
            .reduce(&FormDataAction::Load(record))
            .unwrap_err();
        assert_eq!(
            error,
            FormError::IncompleteValues {
                missing: vec!["age".into(), "agree".into()]
            }
        );
    }

    #[test]
    fn test_restore() {
        let state = new_state(false)
            .reduce(&FormDataAction::set_value("name", "Ada"))
            .unwrap()
            .reduce(&FormDataAction::set_edited_field("name"))
            .unwrap()
            .reduce(&FormDataAction::Restore)
            .unwrap();
        assert_eq!(state.values, state.original_values);
        assert!(!state.is_changed);
        assert!(state.edited_fields.values().all(|it| !it));
        assert_eq!(state.errors["name"].as_deref(), Some("Required"));
    }

    #[test]
    fn test_boundary_errors() {
        let state = new_state(false);
        assert_eq!(
            state
                .reduce(&FormDataAction::set_value("nope", "x"))
                .unwrap_err(),
            FormError::UnknownField {
                field_name: "nope".into()
            }
        );
        assert!(matches!(
            state.reduce(&FormDataAction::set_value("agree", "yes")),
            Err(FormError::ValueTypeMismatch { .. })
        ));
        assert!(matches!(
            state.reduce(&FormDataAction::set_edited_field("nope")),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_in_a_store() {
        let published = Arc::new(Mutex::new(0));
        let mut store = FormDataStore::new(new_state(false), form_data_reducer);
        let published_clone = published.clone();
        store.subscribe(move |_| *published_clone.lock().unwrap() += 1);

        store.dispatch(&FormDataAction::set_value("name", "Ada")).unwrap();
        store.dispatch(&FormDataAction::set_value("name", "Ada")).unwrap();
        assert_eq!(*published.lock().unwrap(), 1);
        assert!(store.get_state().is_valid);
    }
}
