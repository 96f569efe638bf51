//! Assertion helpers shared by step bindings and spec cases.
//!
//! Each helper returns [`StepError::Assertion`] naming the subject, the
//! expected value and the value actually observed.

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::petstore::CapturedResponse;
use crate::session::StepError;

/// Checks the status code of `response`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the status differs.
pub fn expect_status(response: &CapturedResponse, expected: u16) -> Result<(), StepError> {
    if response.status() == expected {
        return Ok(());
    }
    Err(StepError::assertion(
        format!("status of {} {}", response.method(), response.url()),
        expected,
        response.status(),
    ))
}

/// Looks up a dotted field path such as `category.name`.
#[must_use]
pub fn lookup<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(body, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
}

/// Returns the field at `field`, failing when it is absent.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the field is missing.
pub fn expect_field_present<'a>(body: &'a Value, field: &str) -> Result<&'a Value, StepError> {
    lookup(body, field).ok_or_else(|| StepError::assertion(format!("field `{field}`"), "present", "missing"))
}

/// Checks that `field` equals `expected`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the field is missing or differs.
pub fn expect_field(body: &Value, field: &str, expected: &Value) -> Result<(), StepError> {
    let actual = expect_field_present(body, field)?;
    if actual == expected {
        return Ok(());
    }
    Err(StepError::assertion(format!("field `{field}`"), expected, actual))
}

/// Checks that `field` is the string `expected`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the field is missing or differs.
pub fn expect_str_field(body: &Value, field: &str, expected: &str) -> Result<(), StepError> {
    expect_field(body, field, &Value::String(expected.to_owned()))
}

/// Returns the integer at `field`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the field is missing or is not an
/// integer.
pub fn expect_i64_field(body: &Value, field: &str) -> Result<i64, StepError> {
    let value = expect_field_present(body, field)?;
    value
        .as_i64()
        .ok_or_else(|| StepError::assertion(format!("field `{field}`"), "an integer", value))
}

/// Checks that `body` is a JSON array and returns its items.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] for any other JSON type.
pub fn expect_array(body: &Value) -> Result<&[Value], StepError> {
    body.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| StepError::assertion("response body", "a JSON array", json_kind(body)))
}

/// Checks that `body` is a JSON array with at least one item.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the body is not an array or is
/// empty.
pub fn expect_non_empty_array(body: &Value) -> Result<&[Value], StepError> {
    let items = expect_array(body)?;
    if items.is_empty() {
        return Err(StepError::assertion(
            "response body",
            "a non-empty array",
            "an empty array",
        ));
    }
    Ok(items)
}

/// Checks that `body` is a JSON object with at least one key.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the body is not an object or has
/// no keys.
pub fn expect_non_empty_object(body: &Value) -> Result<&Map<String, Value>, StepError> {
    let map = body
        .as_object()
        .ok_or_else(|| StepError::assertion("response body", "a JSON object", json_kind(body)))?;
    if map.is_empty() {
        return Err(StepError::assertion(
            "response body",
            "an object with at least one key",
            "an empty object",
        ));
    }
    Ok(map)
}

/// Checks that `actual` contains `needle`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the substring is absent.
pub fn expect_text_contains(subject: &str, actual: &str, needle: &str) -> Result<(), StepError> {
    if actual.contains(needle) {
        return Ok(());
    }
    Err(StepError::assertion(
        subject,
        format!("text containing \"{needle}\""),
        format!("\"{actual}\""),
    ))
}

/// Checks that every item in `items` carries `status`.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] naming the first mismatching item.
pub fn expect_all_with_status(items: &[Value], status: &str) -> Result<(), StepError> {
    for (index, item) in items.iter().enumerate() {
        let actual = item.get("status").and_then(Value::as_str);
        if actual != Some(status) {
            return Err(StepError::assertion(
                format!("status of item {index}"),
                status,
                actual.unwrap_or("<missing>"),
            ));
        }
    }
    Ok(())
}

/// Checks plain equality for values that are not JSON.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the values differ.
pub fn expect_eq<T>(subject: &str, expected: &T, actual: &T) -> Result<(), StepError>
where
    T: PartialEq + Display + ?Sized,
{
    if expected == actual {
        return Ok(());
    }
    Err(StepError::assertion(subject, expected, actual))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
