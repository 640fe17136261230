//! Form state.
//!
//! A [`FormState`] is an ordered set of named text fields, the in-memory stand-in for
//! an HTML form. Serialization follows form-data semantics: every declared field is
//! emitted, empty or not.

use crate::error::{IntakeError, IntakeResult};
use crate::models::value_text;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    fields: Vec<(String, String)>,
}

impl FormState {
    /// Creates a form with the given fields, all empty.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            fields: names
                .into_iter()
                .map(|name| (name.to_owned(), String::new()))
                .collect(),
        }
    }

    /// Value of `name`, or `None` if the form has no such field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Validation` if the form has no field called `name`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> IntakeResult<()> {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(IntakeError::Validation(format!("campo desconocido: {name}"))),
        }
    }

    /// Clears every field.
    pub fn reset(&mut self) {
        for (_, value) in &mut self.fields {
            value.clear();
        }
    }

    /// Every field in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Field-name to value map suitable as a request body.
    pub fn serialize(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect()
    }

    /// Overwrites the form from a response body.
    ///
    /// Fields present in `data` take its value (as text); fields absent from `data`
    /// are cleared. Keys in `data` with no matching field are ignored.
    pub fn populate(&mut self, data: &Map<String, Value>) {
        for (name, value) in &mut self.fields {
            *value = data.get(name.as_str()).map(value_text).unwrap_or_default();
        }
    }
}
