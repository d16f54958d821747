//! Turns an uploaded quote request into the studio notification email.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tera::{Context, Tera};
use validator::Validate;

use crate::domain::email::QuoteEmail;
use crate::domain::project_type::ProjectType;
use crate::domain::submission::QuoteData;
use crate::domain::types::ContactEmail;
use crate::forms::quote::{AttachmentLimits, QuoteUpload};
use crate::mailer::QuoteMailer;
use crate::services::{ServiceError, ServiceResult};

pub const MISSING_DATA_MESSAGE: &str = "Missing form data";
pub const INVALID_DATA_MESSAGE: &str = "Neispravni podaci forme.";
pub const NOT_CONFIGURED_MESSAGE: &str = "Email servis nije konfigurisan.";
pub const SEND_FAILED_MESSAGE: &str =
    "Došlo je do greške prilikom slanja upita. Molimo pokušajte ponovo.";
pub const SUCCESS_MESSAGE: &str =
    "Vaš upit je uspješno poslan. Kontaktiraćemo vas u najkraćem mogućem roku.";

const HTML_TEMPLATE: &str = "quote_email.html";
const TEXT_TEMPLATE: &str = "quote_email.txt";

/// Form fields that may hold the requester's address, in priority order.
const REPLY_TO_FIELDS: [&str; 2] = ["email", "contactEmail"];

/// Confirmation returned to the visitor once the email is handed off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteAck {
    pub message: String,
}

/// One `Label: value` line of the email summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

/// Compiles the embedded email templates.
pub fn email_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            HTML_TEMPLATE,
            include_str!("../../templates/quote_email.html"),
        ),
        (TEXT_TEMPLATE, include_str!("../../templates/quote_email.txt")),
    ])?;
    Ok(tera)
}

/// Message for uploads refused by `limits`, naming the configured ceilings.
pub fn too_large_message(limits: &AttachmentLimits) -> String {
    format!(
        "Priloženi fajlovi premašuju dozvoljenu veličinu. Dozvoljeno je najviše {} fajlova, \
         do {} po fajlu i {} ukupno.",
        limits.max_files,
        format_size(limits.max_file_bytes),
        format_size(limits.max_total_bytes)
    )
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Turns a camelCase or snake_case key into a readable label:
/// `fullName` becomes `Full Name`, `contact_email` becomes `Contact email`.
pub fn format_field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
            label.push(c);
        } else if c == '_' {
            label.push(' ');
        } else {
            label.push(c);
        }
    }

    let mut chars = label.chars();
    let label = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    label.trim().to_string()
}

/// Display form of a submitted value, or `None` when it should be left out.
fn format_field_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(items) if items.is_empty() => None,
        // Uploaded files serialize as objects and travel as attachments.
        Value::Array(items) if items[0].is_object() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(map) if map.is_empty() => None,
        Value::Object(_) => serde_json::to_string_pretty(value).ok(),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
    }
}

/// Summary lines for every displayable value, in submission order.
pub fn summary_rows(form_data: &Map<String, Value>) -> Vec<SummaryRow> {
    form_data
        .iter()
        .filter_map(|(key, value)| {
            format_field_value(value).map(|value| SummaryRow {
                label: format_field_label(key),
                value,
            })
        })
        .collect()
}

/// First valid requester address found in the form data.
pub fn reply_to_address(form_data: &Map<String, Value>) -> Option<ContactEmail> {
    let candidate = REPLY_TO_FIELDS
        .iter()
        .filter_map(|key| form_data.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())?;

    match ContactEmail::new(candidate) {
        Ok(email) => Some(email),
        Err(_) => {
            log::warn!("Ignoring invalid reply-to address in quote request");
            None
        }
    }
}

fn format_date(now: NaiveDateTime) -> String {
    now.format("%-d. %-m. %Y.").to_string()
}

fn format_date_time(now: NaiveDateTime) -> String {
    now.format("%-d. %-m. %Y. %H:%M:%S").to_string()
}

/// Renders the notification for a parsed request. `now` is local time.
pub fn build_quote_email(
    tera: &Tera,
    data: &QuoteData,
    attachments: Vec<crate::domain::attachment::Attachment>,
    now: NaiveDateTime,
) -> ServiceResult<QuoteEmail> {
    let project_label = ProjectType::label_for(&data.project_type);
    let rows = summary_rows(&data.form_data);
    let filenames: Vec<&str> = attachments.iter().map(|a| a.filename.as_str()).collect();

    let mut context = Context::new();
    context.insert("project_label", project_label);
    context.insert("submitted_at", &format_date_time(now));
    context.insert("rows", &rows);
    context.insert("attachments", &filenames);

    let text_body = tera.render(TEXT_TEMPLATE, &context)?;
    context.insert("text_body", &text_body);
    let html_body = tera.render(HTML_TEMPLATE, &context)?;

    Ok(QuoteEmail {
        subject: format!("[UPIT] {project_label} - {}", format_date(now)),
        text_body,
        html_body,
        reply_to: reply_to_address(&data.form_data),
        attachments,
    })
}

/// Parses the upload, renders the email and sends it in a single attempt.
pub fn submit_quote<M>(
    mailer: &M,
    tera: &Tera,
    upload: QuoteUpload,
    now: NaiveDateTime,
) -> ServiceResult<QuoteAck>
where
    M: QuoteMailer + ?Sized,
{
    let raw = upload
        .data
        .filter(|data| !data.is_empty())
        .ok_or(ServiceError::MissingData)?;

    let data: QuoteData =
        serde_json::from_str(&raw).map_err(|err| ServiceError::InvalidData(err.to_string()))?;
    data.validate()
        .map_err(|err| ServiceError::InvalidData(err.to_string()))?;

    let attachment_count = upload.attachments.len();
    let email = build_quote_email(tera, &data, upload.attachments, now)?;

    mailer.send_quote(&email).map_err(|err| {
        log::error!("Failed to send quote email: {err}");
        ServiceError::from(err)
    })?;

    log::info!(
        "Quote email for {} sent with {attachment_count} attachment(s)",
        data.project_type
    );

    Ok(QuoteAck {
        message: SUCCESS_MESSAGE.to_string(),
    })
}
