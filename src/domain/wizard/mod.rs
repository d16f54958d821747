//! Static definitions of the quote wizard: steps, fields and field kinds.
//!
//! Each field kind carries exactly the data it needs (bounds for numbers,
//! options for choice groups) and validates its own values, so adding a kind
//! means adding one variant and one match arm in [`WizardField::validate`].

use chrono::{Datelike, Local};
use serde::{Serialize, Serializer};

use crate::domain::form_values::FieldValue;

pub mod config;

pub use config::steps_for;

/// Message for a required field left blank.
pub const REQUIRED_MESSAGE: &str = "Ovo polje je obavezno";
/// Message for an email field without an at-sign.
pub const EMAIL_MESSAGE: &str = "Unesite validnu email adresu";

/// Selectable option of a select, radio or checkbox field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Inclusive numeric bound of a number field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Fixed(f64),
    /// The current calendar year, resolved when the bound is read.
    CurrentYear,
}

impl Bound {
    pub fn value(self) -> f64 {
        match self {
            Bound::Fixed(value) => value,
            Bound::CurrentYear => f64::from(Local::now().year()),
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// Input kind of a wizard field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Textarea,
    Date,
    File,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<Bound>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<Bound>,
    },
    Select {
        options: &'static [FieldOption],
    },
    Radio {
        options: &'static [FieldOption],
    },
    Checkbox {
        options: &'static [FieldOption],
    },
}

impl FieldKind {
    /// Options offered by choice-based kinds; empty for the rest.
    pub fn options(&self) -> &'static [FieldOption] {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => options,
            _ => &[],
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FieldKind::File)
    }

    /// Whether `value` may be stored directly in a field of this kind.
    /// Attachments are never accepted here; they go through the wizard's
    /// file operations so the size ceiling applies.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            FieldKind::File => false,
            FieldKind::Number { .. } => {
                matches!(value, FieldValue::Number(_) | FieldValue::Text(_))
            }
            FieldKind::Checkbox { .. } => matches!(value, FieldValue::Choices(_)),
            FieldKind::Text
            | FieldKind::Email
            | FieldKind::Textarea
            | FieldKind::Date
            | FieldKind::Select { .. }
            | FieldKind::Radio { .. } => matches!(value, FieldValue::Text(_)),
        }
    }
}

/// One input of a wizard step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardField {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'static str>,
}

impl WizardField {
    pub const fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            required: false,
            placeholder: None,
            help_text: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub const fn help_text(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }

    /// Checks `value` against this field's rules and returns the message to
    /// show next to the field. Optional fields always pass.
    pub fn validate(&self, value: Option<&FieldValue>) -> Option<String> {
        if !self.required {
            return None;
        }

        match self.kind {
            FieldKind::Email => match value.and_then(FieldValue::as_text) {
                Some(text) if text.contains('@') => None,
                _ => Some(EMAIL_MESSAGE.to_string()),
            },
            FieldKind::Number { min, max } => validate_number(value, min, max),
            FieldKind::Checkbox { .. } => match value {
                Some(FieldValue::Choices(choices)) if !choices.is_empty() => None,
                _ => Some(REQUIRED_MESSAGE.to_string()),
            },
            FieldKind::File => match value {
                Some(FieldValue::Files(files)) if !files.is_empty() => None,
                _ => Some(REQUIRED_MESSAGE.to_string()),
            },
            FieldKind::Text
            | FieldKind::Textarea
            | FieldKind::Date
            | FieldKind::Select { .. }
            | FieldKind::Radio { .. } => match value.and_then(FieldValue::as_text) {
                Some(text) if !text.trim().is_empty() => None,
                _ => Some(REQUIRED_MESSAGE.to_string()),
            },
        }
    }
}

fn validate_number(
    value: Option<&FieldValue>,
    min: Option<Bound>,
    max: Option<Bound>,
) -> Option<String> {
    let Some(number) = value.and_then(FieldValue::as_number) else {
        return Some(REQUIRED_MESSAGE.to_string());
    };

    match (min.map(Bound::value), max.map(Bound::value)) {
        (Some(min), _) if number < min => {
            Some(format!("Minimalna vrednost je {}", format_number(min)))
        }
        (_, Some(max)) if number > max => {
            Some(format!("Maksimalna vrednost je {}", format_number(max)))
        }
        _ => None,
    }
}

/// Formats a bound without a trailing `.0` for whole numbers.
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// One screen of the wizard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WizardStep {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: &'static [WizardField],
}

impl WizardStep {
    /// Looks up a field of this step by id.
    pub fn field(&self, field_id: &str) -> Option<&'static WizardField> {
        self.fields.iter().find(|field| field.id == field_id)
    }
}
