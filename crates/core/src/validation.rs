//! Input validation for command-line field assignments.
//!
//! Forms are filled from `name=value` pairs. This module splits and checks them
//! before they reach a controller.

use crate::error::{IntakeError, IntakeResult};

/// Splits a `name=value` assignment.
///
/// The name is trimmed and must be non-empty; the value is kept verbatim (it may be
/// empty or contain `=`).
///
/// # Errors
///
/// Returns `IntakeError::Validation` when there is no `=` or the name is empty.
pub fn parse_field_assignment(input: &str) -> IntakeResult<(String, String)> {
    let (name, value) = input.split_once('=').ok_or_else(|| {
        IntakeError::Validation(format!("expected name=value, got '{input}'"))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(IntakeError::Validation(format!(
            "field name cannot be empty in '{input}'"
        )));
    }

    Ok((name.to_owned(), value.to_owned()))
}
