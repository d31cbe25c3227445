//! Recoverable errors as values.
//!
//! Each failure is its own type carrying what went wrong, matched by the
//! caller at the nearest boundary that can do something about it.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("index {index} is out of range for length {len}")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Checked indexing.
pub fn element_at(values: &[i32], index: usize) -> Result<i32, IndexOutOfRange> {
    values
        .get(index)
        .copied()
        .ok_or(IndexOutOfRange { index, len: values.len() })
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Age {age} is invalid")]
pub struct InvalidAge {
    pub age: i32,
}

pub const MAX_AGE: i32 = 150;

/// Accepts ages in `0..=150`.
pub fn validate_age(age: i32) -> Result<(), InvalidAge> {
    if (0..=MAX_AGE).contains(&age) { Ok(()) } else { Err(InvalidAge { age }) }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("Value cannot be negative")]
    Negative,
    #[error("Attempted to divide by zero")]
    DivideByZero,
}

pub fn check_value(value: i32) -> Result<(), ValueError> {
    match value {
        v if v < 0 => Err(ValueError::Negative),
        0 => Err(ValueError::DivideByZero),
        _ => Ok(()),
    }
}

/// Reports only the failures this caller knows how to describe; a guard on
/// the match arm filters which errors are handled.
pub fn describe_value(value: i32) -> Option<&'static str> {
    match check_value(value) {
        Err(e @ ValueError::Negative) if e.to_string().contains("negative") => {
            Some("Argument was negative")
        }
        Err(ValueError::DivideByZero) => Some("Division by zero"),
        _ => None,
    }
}

/// Defaulting and optional chaining over an `Option`.
pub fn describe_optional(input: Option<&str>) -> String {
    let result = input.unwrap_or("Default Value");
    let length = input.map(str::len).map(|n| n.to_string()).unwrap_or_default();
    format!("Result: {result}, Length: {length}")
}

pub fn lines() -> Vec<String> {
    let mut out = vec!["1. Basic Error Handling:".to_owned()];
    match element_at(&[1, 2, 3], 10) {
        Ok(value) => out.push(value.to_string()),
        Err(e) => out.push(format!("Error: Array index out of range - {e}")),
    }
    out.push("Cleanup code always executes".to_owned());

    out.push("2. Custom Error:".to_owned());
    for age in [25, 200] {
        match validate_age(age) {
            Ok(()) => out.push(format!("Age {age} is valid")),
            Err(e) => {
                out.push(format!("Caught custom error: {e}"));
                break;
            }
        }
    }

    out.push("3. Error Filtering:".to_owned());
    if let Some(description) = describe_value(-5) {
        out.push(description.to_owned());
    }

    out.push("4. Optional Values:".to_owned());
    out.push(describe_optional(None));
    out
}
