// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde_json::{Map, Value};

use super::{decode_field, encode_field};
use crate::{FieldDefinitions, FieldValue, FieldValues, FormResult, LocaleContext,
            check_values};

/// Read a form's values out of a nested data model.
///
/// Fields with a data path are decoded from the model. An absent path falls back to the
/// field's declared initial value, if it has one. Fields without a data path start from
/// their resolved initial value. The result has an entry for every field, in
/// declaration order, ready for [`crate::FormDataAction::Load`].
///
/// # Errors
///
/// [`crate::FormError::ValueTypeMismatch`] if the model holds a value whose JSON shape
/// can't belong to its field.
pub fn deserialize(
    model: &Value,
    field_definitions: &FieldDefinitions,
    locale: &LocaleContext,
) -> FormResult<FieldValues> {
    let mut acc = FieldValues::with_capacity(field_definitions.len());

    for (field_name, definition) in field_definitions {
        let value = match &definition.data_path {
            None => definition.resolved_initial_value(),
            Some(data_path) => match (data_path.get(model), &definition.initial_value) {
                (None, Some(initial_value)) => initial_value.clone(),
                (raw, _) => decode_field(field_name, definition, raw, locale)?,
            },
        };
        acc.insert(field_name.clone(), value);
    }

    // % is Display, ? is Debug.
    tracing::debug!(message = "📤 deserialized form", fields = %acc.len());

    Ok(acc)
}

/// Write a form's values into a new data model.
///
/// Fields without a data path, and read only fields, are skipped. Text, Dropdown,
/// NullableBoolean, NullableFloat, and NullableInteger fields are always written, even
/// when their encoded value is `null` or `""`. Every other type is left out of the model
/// when its encoded value is `null` or `""`.
///
/// # Errors
///
/// - [`crate::FormError::UnknownField`] if `values` names an undeclared field.
/// - [`crate::FormError::ValueTypeMismatch`] if a value can't belong to its field.
pub fn serialize(
    values: &FieldValues,
    field_definitions: &FieldDefinitions,
    locale: &LocaleContext,
) -> FormResult<Value> {
    check_values(values, field_definitions)?;

    let undefined = FieldValue::Undefined;
    let mut model = Value::Object(Map::new());

    for (field_name, definition) in field_definitions {
        let Some(data_path) = &definition.data_path else {
            continue;
        };
        if definition.is_read_only {
            continue;
        }

        let value = values.get(field_name).unwrap_or(&undefined);
        let encoded = encode_field(definition, value, locale)?;
        if definition.data_type().is_always_serialized() || !is_empty_json(&encoded) {
            data_path.set(&mut model, encoded);
        }
    }

    tracing::debug!(message = "📥 serialized form", fields = %values.len());

    Ok(model)
}

/// [`deserialize`] applied to each row.
///
/// # Errors
///
/// See [`deserialize`].
pub fn deserialize_list(
    rows: &[Value],
    field_definitions: &FieldDefinitions,
    locale: &LocaleContext,
) -> FormResult<Vec<FieldValues>> {
    rows.iter()
        .map(|row| deserialize(row, field_definitions, locale))
        .collect()
}

/// [`serialize`] applied to each row, giving a JSON array.
///
/// # Errors
///
/// See [`serialize`].
pub fn serialize_list(
    rows: &[FieldValues],
    field_definitions: &FieldDefinitions,
    locale: &LocaleContext,
) -> FormResult<Value> {
    rows.iter()
        .map(|row| serialize(row, field_definitions, locale))
        .collect::<FormResult<Vec<Value>>>()
        .map(Value::Array)
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::{DateTimeRules, DropdownRules, FieldDefinition, FieldKind, FloatRules,
                FormError, IntegerRules, StringTable};

    fn en_us() -> LocaleContext {
        LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap()
    }

    fn one(kind: FieldKind) -> FieldDefinitions {
        let mut acc = FieldDefinitions::new();
        acc.insert("f".into(), FieldDefinition::new("F", kind).with_data_path("a.f"));
        acc
    }

    fn decode(kind: FieldKind, model: Value) -> FieldValue {
        deserialize(&model, &one(kind), &en_us()).unwrap()["f"].clone()
    }

    fn encode(kind: FieldKind, value: FieldValue) -> Value {
        let mut values = FieldValues::new();
        values.insert("f".into(), value);
        serialize(&values, &one(kind), &en_us()).unwrap()
    }

    #[test_case(json!({"a": {"f": "0001-01-01"}}), FieldValue::Undefined ; "sentinel")]
    #[test_case(json!({"a": {"f": null}}), FieldValue::Undefined ; "null")]
    #[test_case(json!({"a": {"f": ""}}), FieldValue::Undefined ; "empty")]
    #[test_case(json!({}), FieldValue::Undefined ; "absent")]
    #[test_case(
        json!({"a": {"f": "2024-02-29"}}),
        FieldValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()) ;
        "iso"
    )]
    #[test_case(json!({"a": {"f": "someday"}}), FieldValue::text("someday") ; "unparseable")]
    fn test_decode_date(model: Value, expected: FieldValue) {
        assert_eq!(decode(FieldKind::date(), model), expected);
    }

    #[test_case(json!({"a": {"f": null}}), FieldValue::empty_text() ; "null")]
    #[test_case(
        json!({"a": {"f": "2024-03-01T09:30:00+01:00"}}),
        FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()) ;
        "rfc 3339"
    )]
    #[test_case(
        json!({"a": {"f": "2024-03-01 08:30:00"}}),
        FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()) ;
        "local in context zone"
    )]
    #[test_case(
        json!({"a": {"f": "Fri, 01 Mar 2024 08:30:00 GMT"}}),
        FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()) ;
        "rfc 2822"
    )]
    #[test_case(
        json!({"a": {"f": 1_709_281_800_000_i64}}),
        FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()) ;
        "epoch millis"
    )]
    fn test_decode_date_time(model: Value, expected: FieldValue) {
        assert_eq!(decode(FieldKind::date_time(), model), expected);
    }

    #[test_case(FieldKind::integer(), json!({}), FieldValue::Integer(0) ; "integer absent")]
    #[test_case(FieldKind::integer(), json!({"a": {"f": "1,234"}}), FieldValue::Integer(1234) ; "integer text")]
    #[test_case(FieldKind::integer(), json!({"a": {"f": "x"}}), FieldValue::Integer(0) ; "integer garbage")]
    #[test_case(FieldKind::nullable_integer(), json!({}), FieldValue::Null ; "nullable integer absent")]
    #[test_case(FieldKind::nullable_integer(), json!({"a": {"f": 7}}), FieldValue::Integer(7) ; "nullable integer")]
    #[test_case(FieldKind::float(), json!({"a": {"f": 2.345}}), FieldValue::Float(2.35) ; "float rounded")]
    #[test_case(FieldKind::float(), json!({"a": {"f": null}}), FieldValue::Float(0.0) ; "float null")]
    #[test_case(FieldKind::nullable_float(), json!({"a": {"f": null}}), FieldValue::Null ; "nullable float null")]
    #[test_case(FieldKind::text(), json!({"a": {"f": null}}), FieldValue::empty_text() ; "text null")]
    #[test_case(FieldKind::Boolean, json!({"a": {"f": "false"}}), FieldValue::Boolean(false) ; "boolean false string")]
    #[test_case(FieldKind::Boolean, json!({"a": {"f": "yes"}}), FieldValue::Boolean(true) ; "boolean truthy")]
    #[test_case(FieldKind::Boolean, json!({"a": {"f": 0}}), FieldValue::Boolean(false) ; "boolean zero")]
    #[test_case(FieldKind::NullableBoolean, json!({}), FieldValue::Null ; "nullable boolean absent")]
    #[test_case(FieldKind::time(), json!({"a": {"f": "21:05:00"}}), FieldValue::Time(NaiveTime::from_hms_opt(21, 5, 0).unwrap()) ; "time")]
    fn test_decode(kind: FieldKind, model: Value, expected: FieldValue) {
        assert_eq!(decode(kind, model), expected);
    }

    #[test]
    fn test_local_date_time_is_read_in_the_context_or_field_zone() {
        let locale = en_us().with_time_zone(chrono_tz::America::New_York);
        let model = json!({"a": {"f": "2024-03-01T09:30:00"}});

        let values = deserialize(&model, &one(FieldKind::date_time()), &locale).unwrap();
        let FieldValue::DateTime(it) = values["f"] else {
            panic!("expected DateTime");
        };
        assert_eq!(it, Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap());
        assert_eq!(
            locale.formatter().format_date_time(it, None, None),
            "03/01/2024 9:30 AM"
        );

        let berlin = FieldKind::DateTime(DateTimeRules {
            time_zone: Some(chrono_tz::Europe::Berlin),
            ..Default::default()
        });
        let values = deserialize(&model, &one(berlin), &locale).unwrap();
        assert_eq!(
            values["f"],
            FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_array_paths_keep_the_model_shape() {
        let locale = en_us();
        let mut field_definitions = FieldDefinitions::new();
        field_definitions.insert(
            "first_tag".into(),
            FieldDefinition::new("Tag", FieldKind::text()).with_data_path("tags.0"),
        );
        field_definitions.insert(
            "second_phone".into(),
            FieldDefinition::new("Phone", FieldKind::text())
                .with_data_path("person.phones.1.number"),
        );

        let model = json!({
            "tags": ["a"],
            "person": { "phones": [{ "number": "1" }, { "number": "2" }] }
        });
        let values = deserialize(&model, &field_definitions, &locale).unwrap();
        assert_eq!(values["first_tag"], FieldValue::text("a"));
        assert_eq!(values["second_phone"], FieldValue::text("2"));

        assert_eq!(
            serialize(&values, &field_definitions, &locale).unwrap(),
            json!({
                "tags": ["a"],
                "person": { "phones": [null, { "number": "2" }] }
            })
        );
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let error = deserialize(&json!({"a": {"f": {"x": 1}}}), &one(FieldKind::text()), &en_us())
            .unwrap_err();
        assert!(matches!(error, FormError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn test_absent_path_uses_initial_value_and_ui_only_fields_are_populated() {
        let mut field_definitions = FieldDefinitions::new();
        field_definitions.insert(
            "qty".into(),
            FieldDefinition::new("Qty", FieldKind::integer())
                .with_data_path("qty")
                .with_initial_value(5_i64),
        );
        field_definitions.insert(
            "confirm".into(),
            FieldDefinition::new("Confirm", FieldKind::Boolean),
        );

        let values = deserialize(&json!({}), &field_definitions, &en_us()).unwrap();
        assert_eq!(values["qty"], FieldValue::Integer(5));
        assert_eq!(values["confirm"], FieldValue::Boolean(false));

        let values = deserialize(&json!({"qty": 9}), &field_definitions, &en_us()).unwrap();
        assert_eq!(values["qty"], FieldValue::Integer(9));
    }

    #[test_case(FieldKind::text(), FieldValue::empty_text(), json!({"a": {"f": ""}}) ; "text always written")]
    #[test_case(FieldKind::dropdown(vec![]), FieldValue::Undefined, json!({"a": {"f": null}}) ; "dropdown always written")]
    #[test_case(FieldKind::nullable_integer(), FieldValue::Null, json!({"a": {"f": null}}) ; "nullable integer always written")]
    #[test_case(FieldKind::nullable_float(), FieldValue::Null, json!({"a": {"f": null}}) ; "nullable float always written")]
    #[test_case(FieldKind::NullableBoolean, FieldValue::Null, json!({"a": {"f": null}}) ; "nullable boolean always written")]
    #[test_case(FieldKind::integer(), FieldValue::empty_text(), json!({}) ; "integer omitted when empty")]
    #[test_case(FieldKind::date(), FieldValue::Undefined, json!({}) ; "date omitted when empty")]
    #[test_case(FieldKind::rich_text(), FieldValue::empty_text(), json!({}) ; "rich text omitted when empty")]
    #[test_case(FieldKind::date_time(), FieldValue::empty_text(), json!({}) ; "date time omitted when empty")]
    fn test_write_policy(kind: FieldKind, value: FieldValue, expected: Value) {
        assert_eq!(encode(kind, value), expected);
    }

    #[test]
    fn test_encode_parses_user_text() {
        assert_eq!(
            encode(FieldKind::date(), FieldValue::text("02/29/2024")),
            json!({"a": {"f": "2024-02-29"}})
        );
        assert_eq!(
            encode(FieldKind::date_time(), FieldValue::text("03/01/2024 9:30 AM")),
            json!({"a": {"f": "2024-03-01T09:30:00.000Z"}})
        );
        assert_eq!(
            encode(FieldKind::time(), FieldValue::text("9:05 PM")),
            json!({"a": {"f": "21:05:00"}})
        );
        assert_eq!(
            encode(FieldKind::integer(), FieldValue::text("1,234")),
            json!({"a": {"f": 1234}})
        );
        assert_eq!(
            encode(
                FieldKind::Float(FloatRules {
                    precision: Some(1),
                    ..Default::default()
                }),
                FieldValue::text("1,234.56")
            ),
            json!({"a": {"f": 1234.6}})
        );
        assert_eq!(
            encode(FieldKind::Boolean, FieldValue::Boolean(false)),
            json!({"a": {"f": false}})
        );
    }

    #[test]
    fn test_dropdown_null_when_empty() {
        let kind = FieldKind::Dropdown(DropdownRules {
            is_null_when_empty: true,
            ..Default::default()
        });
        assert_eq!(
            encode(kind.clone(), FieldValue::empty_text()),
            json!({"a": {"f": null}})
        );
        assert_eq!(encode(kind, FieldValue::text("x")), json!({"a": {"f": "x"}}));
        assert_eq!(
            encode(FieldKind::dropdown(vec![]), FieldValue::empty_text()),
            json!({"a": {"f": ""}})
        );
    }

    #[test]
    fn test_read_only_and_ui_only_fields_are_not_written() {
        let mut field_definitions = FieldDefinitions::new();
        field_definitions.insert(
            "id".into(),
            FieldDefinition::new("Id", FieldKind::text())
                .with_data_path("id")
                .read_only(),
        );
        field_definitions.insert("note".into(), FieldDefinition::new("Note", FieldKind::text()));
        field_definitions.insert(
            "qty".into(),
            FieldDefinition::new(
                "Qty",
                FieldKind::Integer(IntegerRules::default()),
            )
            .with_data_path("order.qty"),
        );

        let mut values = FieldValues::new();
        values.insert("id".into(), FieldValue::text("42"));
        values.insert("note".into(), FieldValue::text("hello"));
        values.insert("qty".into(), FieldValue::Integer(3));

        assert_eq!(
            serialize(&values, &field_definitions, &en_us()).unwrap(),
            json!({"order": {"qty": 3}})
        );
    }

    #[test]
    fn test_list_fields_round_trip_row_wise() {
        let mut row_fields = FieldDefinitions::new();
        row_fields.insert(
            "number".into(),
            FieldDefinition::new("Number", FieldKind::text()).with_data_path("number"),
        );
        row_fields.insert(
            "primary".into(),
            FieldDefinition::new("Primary", FieldKind::Boolean).with_data_path("primary"),
        );
        let mut field_definitions = FieldDefinitions::new();
        field_definitions.insert(
            "phones".into(),
            FieldDefinition::new("Phones", FieldKind::list(row_fields))
                .with_data_path("person.phones"),
        );

        let model = json!({"person": {"phones": [
            {"number": "555-0100", "primary": true},
            {"number": "555-0199"}
        ]}});
        let values = deserialize(&model, &field_definitions, &en_us()).unwrap();
        let FieldValue::List(rows) = &values["phones"] else {
            panic!("expected a list");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["primary"], FieldValue::Boolean(false));

        assert_eq!(
            serialize(&values, &field_definitions, &en_us()).unwrap(),
            json!({"person": {"phones": [
                {"number": "555-0100", "primary": true},
                {"number": "555-0199", "primary": false}
            ]}})
        );
    }
}
