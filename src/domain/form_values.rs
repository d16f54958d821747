//! Values entered by the visitor and per-field validation messages.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::domain::attachment::Attachment;

/// Value held for a single wizard field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Selected option values of a checkbox group.
    Choices(Vec<String>),
    /// Attachments of a file field, in the order they were added.
    Files(Vec<Attachment>),
}

impl FieldValue {
    /// Borrow the textual value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Numeric interpretation of the value; text is parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }

    /// Attachments held by a file field.
    pub fn files(&self) -> &[Attachment] {
        match self {
            FieldValue::Files(files) => files,
            _ => &[],
        }
    }

    /// JSON form sent in the submission payload. Files travel as separate
    /// multipart parts and have no JSON form.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Text(text) => Some(Value::String(text.clone())),
            FieldValue::Number(number) => Some(number_to_json(*number)),
            FieldValue::Choices(choices) => Some(Value::from(choices.clone())),
            FieldValue::Files(_) => None,
        }
    }
}

/// Whole numbers are emitted as JSON integers so `180` stays `180`.
fn number_to_json(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Choices(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::Choices(value.into_iter().map(str::to_string).collect())
    }
}

/// Snapshot of everything the visitor entered, keyed by field id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.0.get(field_id)
    }

    pub fn get_mut(&mut self, field_id: &str) -> Option<&mut FieldValue> {
        self.0.get_mut(field_id)
    }

    /// Overwrites the value for `field_id`.
    pub fn set(&mut self, field_id: impl Into<String>, value: FieldValue) {
        self.0.insert(field_id.into(), value);
    }

    /// Attachments currently held by a file field.
    pub fn files(&self, field_id: &str) -> &[Attachment] {
        self.get(field_id).map(FieldValue::files).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value))
    }
}

/// Validation messages keyed by field id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    pub fn insert(&mut self, field_id: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field_id.into(), message.into());
    }

    pub fn remove(&mut self, field_id: &str) -> Option<String> {
        self.0.remove(field_id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(id, message)| (id.as_str(), message.as_str()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field_id, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field_id}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_numbers_are_parsed_after_trimming() {
        assert_eq!(FieldValue::from(" 180 ").as_number(), Some(180.0));
        assert_eq!(FieldValue::from("").as_number(), None);
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::from("NaN").as_number(), None);
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(FieldValue::Number(180.0).to_json(), Some(Value::from(180)));
        assert_eq!(FieldValue::Number(12.5).to_json(), Some(Value::from(12.5)));
        assert_eq!(FieldValue::Files(Vec::new()).to_json(), None);
    }

    #[test]
    fn errors_render_in_field_order() {
        let mut errors = FieldErrors::default();
        errors.insert("email", "Unesite validnu email adresu");
        errors.insert("area", "Minimalna vrednost je 30");
        assert_eq!(
            errors.to_string(),
            "area: Minimalna vrednost je 30; email: Unesite validnu email adresu"
        );
    }
}
