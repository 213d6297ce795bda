// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use pretty_assertions::assert_eq;
use r3bl_forms::{FieldDefinition, FieldDefinitions, FieldErrors, FieldKind, FieldValue,
                 FieldValues, FormDataAction, FormDataState, FormMode, FormModeAction,
                 FormModeState, ListDataAction, ListDataState, LocaleContext, StringTable,
                 deserialize, resource_keys, validate_field};
use serde_json::json;
use test_case::test_case;

fn en_us() -> LocaleContext {
    LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap()
}

#[test]
fn test_grouped_float_is_parsed_and_rounded() {
    let locale = en_us();
    assert_eq!(
        locale.formatter().parse_float("1,234.567", Some(2), false),
        Some(1234.57)
    );
}

#[test]
fn test_required_text_reports_the_locale_message() {
    let locale = en_us();
    let definition = FieldDefinition::new("Name", FieldKind::text()).required();
    let error = validate_field(
        "name",
        &FieldValue::empty_text(),
        &definition,
        &FieldValues::new(),
        &locale,
    );
    assert_eq!(error, Some(locale.str(resource_keys::IS_REQUIRED_ERROR, None)));
    assert_eq!(error.as_deref(), Some("Required"));
}

#[test]
fn test_single_field_revalidation_keeps_other_errors() {
    let mut field_definitions = FieldDefinitions::new();
    field_definitions.insert("a".into(), FieldDefinition::new("A", FieldKind::integer()));
    field_definitions.insert("b".into(), FieldDefinition::new("B", FieldKind::text()));

    let mut stored = FieldErrors::new();
    stored.insert("b".into(), Some("Taken".into()));

    let state = FormDataState::try_new(field_definitions, en_us(), true)
        .unwrap()
        .reduce(&FormDataAction::SetErrors(stored))
        .unwrap();
    let before = state.errors["b"].clone();

    let state = state.reduce(&FormDataAction::set_value("a", 1_i64)).unwrap();
    assert_eq!(state.errors["b"], before);
}

#[test]
fn test_swap_first_and_last_rows() {
    let row = |name: &str| {
        let mut acc = FieldValues::new();
        acc.insert("name".into(), FieldValue::text(name));
        acc
    };
    let state = ListDataState::new(vec![row("A"), row("B"), row("C")], false)
        .reduce(&ListDataAction::SwapItems(0, 2))
        .unwrap();
    assert_eq!(state.items, vec![row("C"), row("B"), row("A")]);
}

#[test]
fn test_sentinel_date_deserializes_to_undefined() {
    let mut field_definitions = FieldDefinitions::new();
    field_definitions.insert(
        "due".into(),
        FieldDefinition::new("Due", FieldKind::date()).with_data_path("due"),
    );
    let values = deserialize(&json!({"due": "0001-01-01"}), &field_definitions, &en_us()).unwrap();
    assert_eq!(values["due"], FieldValue::Undefined);
}

#[test]
fn test_revert_on_fresh_mode_state_is_a_no_op() {
    let state = FormModeState::new(FormMode::Add);
    assert_eq!(state.reduce(&FormModeAction::Revert), state);
}

#[test_case("0" ; "zero")]
#[test_case("7" ; "one digit")]
#[test_case("1,234" ; "grouped")]
#[test_case("-12,345,678" ; "negative grouped")]
#[test_case("1234567" ; "ungrouped")]
fn test_integer_round_trips_after_normalizing_delimiters(text: &str) {
    let locale = en_us();
    let formatter = locale.formatter();
    let parsed = formatter.parse_integer(text, false).unwrap();
    let normalized = |it: &str| it.replace(',', "");
    assert_eq!(
        normalized(&formatter.format_integer(parsed, false)),
        normalized(text)
    );
}

#[test]
fn test_errors_to_show_only_for_edited_fields() {
    let mut field_definitions = FieldDefinitions::new();
    field_definitions.insert(
        "name".into(),
        FieldDefinition::new("Name", FieldKind::text()).required(),
    );
    field_definitions.insert(
        "age".into(),
        FieldDefinition::new("Age", FieldKind::integer()).required(),
    );

    let actions = [
        FormDataAction::set_value("age", "x"),
        FormDataAction::set_edited_field("age"),
        FormDataAction::ShowAllErrors,
        FormDataAction::HideAllErrors,
        FormDataAction::set_edited_field("name"),
        FormDataAction::Restore,
        FormDataAction::set_value("name", "Ada"),
    ];

    let mut state = FormDataState::try_new(field_definitions, en_us(), false).unwrap();
    for action in &actions {
        state = state.reduce(action).unwrap();
        for (field_name, error) in &state.errors_to_show {
            assert!(error.is_none() || state.edited_fields[field_name]);
        }
    }
}
