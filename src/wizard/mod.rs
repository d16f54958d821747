//! Quote wizard state machine.
//!
//! The wizard walks a visitor from project-type selection through the
//! configured steps to a single submission:
//!
//! ```text
//! TypeSelection -> Step(0) -> ... -> Step(n-1) -> Submitting -> Submitted
//! ```
//!
//! A failed submission returns to the last step with every entered value
//! kept, so the visitor can retry without re-entering anything. Transitions
//! are plain method calls; the transport is passed in by the caller.

use chrono::Utc;
use thiserror::Error;

use crate::domain::attachment::{Attachment, DEFAULT_MAX_ATTACHMENT_BYTES};
use crate::domain::form_values::{FieldErrors, FieldValue, FormValues};
use crate::domain::project_type::ProjectType;
use crate::domain::submission::QuoteSubmission;
use crate::domain::wizard::{WizardField, WizardStep, steps_for};

#[cfg(feature = "client")]
pub mod http;
pub mod submit;

pub use submit::{QuoteSubmitter, SubmitAck, SubmitError};

/// Where the visitor currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardPhase {
    TypeSelection,
    Step(usize),
    /// The submission request is in flight.
    Submitting,
    Submitted,
}

/// Result of a successful [`QuoteWizard::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the step with this index.
    Moved(usize),
    /// The last step was completed and the endpoint accepted the request.
    Submitted(SubmitAck),
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("no project type selected")]
    NoProjectType,

    #[error("the request was already submitted")]
    AlreadySubmitted,

    #[error("a submission is already in progress")]
    Busy,

    #[error("submission is only possible from the last step")]
    NotOnLastStep,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} does not accept files")]
    NotAFileField(String),

    #[error("field {0} does not accept this kind of value")]
    WrongValueKind(String),

    #[error(
        "Fajl {filename} je prevelik. Maksimalna veličina je {}MB.",
        .limit / (1024 * 1024)
    )]
    FileTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    #[error("{0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Submission(#[from] SubmitError),
}

/// Client-side state of one quote request.
#[derive(Debug)]
pub struct QuoteWizard {
    project_type: Option<ProjectType>,
    phase: WizardPhase,
    values: FormValues,
    errors: FieldErrors,
    submit_error: Option<String>,
    max_file_bytes: usize,
}

impl Default for QuoteWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteWizard {
    pub fn new() -> Self {
        Self::with_max_file_bytes(DEFAULT_MAX_ATTACHMENT_BYTES)
    }

    /// Wizard with a custom per-file attachment ceiling.
    pub fn with_max_file_bytes(max_file_bytes: usize) -> Self {
        Self {
            project_type: None,
            phase: WizardPhase::TypeSelection,
            values: FormValues::default(),
            errors: FieldErrors::default(),
            submit_error: None,
            max_file_bytes,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        self.project_type
    }

    /// Steps of the active configuration; empty before a type is chosen.
    pub fn steps(&self) -> &'static [WizardStep] {
        self.project_type.map(steps_for).unwrap_or(&[])
    }

    /// Step currently shown, if the wizard is on one.
    pub fn current_step(&self) -> Option<&'static WizardStep> {
        match self.phase {
            WizardPhase::Step(index) => self.steps().get(index),
            _ => None,
        }
    }

    pub fn is_last_step(&self) -> bool {
        matches!(self.phase, WizardPhase::Step(index) if index + 1 == self.steps().len())
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message of the last failed submission, kept until the next attempt.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Activates the configuration for `project_type` and starts over at the
    /// first step with no values.
    pub fn select_project_type(&mut self, project_type: ProjectType) {
        self.project_type = Some(project_type);
        self.phase = WizardPhase::Step(0);
        self.values.clear();
        self.errors.clear();
        self.submit_error = None;
    }

    /// Overwrites a field value and clears its validation message. The value
    /// must fit the field's kind; attachments go through [`Self::add_file`].
    pub fn set_field_value(
        &mut self,
        field_id: &str,
        value: FieldValue,
    ) -> Result<(), WizardError> {
        let field = self.editable_field(field_id)?;
        if !field.kind.accepts(&value) {
            return Err(WizardError::WrongValueKind(field_id.to_string()));
        }
        self.values.set(field.id, value);
        self.errors.remove(field.id);
        Ok(())
    }

    /// Appends an attachment to a file field after checking the size ceiling.
    /// Oversized files are never added.
    pub fn add_file(&mut self, field_id: &str, attachment: Attachment) -> Result<(), WizardError> {
        let field = self.file_field(field_id)?;

        if attachment.size() > self.max_file_bytes {
            return Err(WizardError::FileTooLarge {
                filename: attachment.filename.to_string(),
                size: attachment.size(),
                limit: self.max_file_bytes,
            });
        }

        match self.values.get_mut(field.id) {
            Some(FieldValue::Files(files)) => files.push(attachment),
            _ => self.values.set(field.id, FieldValue::Files(vec![attachment])),
        }
        self.errors.remove(field.id);
        Ok(())
    }

    /// Removes the attachment at `index`, keeping the others in order.
    /// Returns `None` when there is no attachment at that position.
    pub fn remove_file(
        &mut self,
        field_id: &str,
        index: usize,
    ) -> Result<Option<Attachment>, WizardError> {
        let field = self.file_field(field_id)?;

        let removed = match self.values.get_mut(field.id) {
            Some(FieldValue::Files(files)) if index < files.len() => Some(files.remove(index)),
            _ => None,
        };
        self.errors.remove(field.id);
        Ok(removed)
    }

    /// Validation messages for every required field of the current step.
    /// Does not touch the stored values or errors.
    pub fn validate_current_step(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if let Some(step) = self.current_step() {
            for field in step.fields {
                if let Some(message) = field.validate(self.values.get(field.id)) {
                    errors.insert(field.id, message);
                }
            }
        }
        errors
    }

    /// Validates the current step, then moves forward or, on the last step,
    /// submits through `submitter`.
    pub async fn advance<S>(&mut self, submitter: &S) -> Result<Advance, WizardError>
    where
        S: QuoteSubmitter + ?Sized,
    {
        let index = self.step_index()?;
        self.check_current_step()?;

        if index + 1 < self.steps().len() {
            self.phase = WizardPhase::Step(index + 1);
            Ok(Advance::Moved(index + 1))
        } else {
            self.submit(submitter).await.map(Advance::Submitted)
        }
    }

    /// Goes one step back. From the first step this returns to type
    /// selection and discards everything entered.
    pub fn back(&mut self) {
        match self.phase {
            WizardPhase::Step(0) => self.reset(),
            WizardPhase::Step(index) => self.phase = WizardPhase::Step(index - 1),
            _ => {}
        }
    }

    /// Packages every value and attachment into one request and sends it.
    /// On failure the wizard stays on the last step with its data intact.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmitAck, WizardError>
    where
        S: QuoteSubmitter + ?Sized,
    {
        let index = self.step_index()?;
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep);
        }
        self.check_current_step()?;

        let project_type = self.project_type.ok_or(WizardError::NoProjectType)?;
        let submission =
            QuoteSubmission::new(project_type, self.steps(), &self.values, Utc::now());

        self.submit_error = None;
        let in_flight = SubmittingPhase::enter(&mut self.phase, index);
        let result = submitter.submit(&submission).await;
        drop(in_flight);

        match result {
            Ok(ack) => {
                log::info!(
                    "Quote request for {project_type} submitted with {} attachment(s)",
                    submission.attachments.len()
                );
                self.phase = WizardPhase::Submitted;
                self.values.clear();
                self.errors.clear();
                Ok(ack)
            }
            Err(err) => {
                log::warn!("Quote submission failed: {err}");
                self.submit_error = Some(err.user_message().to_string());
                Err(WizardError::Submission(err))
            }
        }
    }

    /// Back to type selection with nothing entered.
    pub fn reset(&mut self) {
        self.project_type = None;
        self.phase = WizardPhase::TypeSelection;
        self.values.clear();
        self.errors.clear();
        self.submit_error = None;
    }

    fn step_index(&self) -> Result<usize, WizardError> {
        match self.phase {
            WizardPhase::Step(index) => Ok(index),
            WizardPhase::TypeSelection => Err(WizardError::NoProjectType),
            WizardPhase::Submitting => Err(WizardError::Busy),
            WizardPhase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Stores the current step's errors and fails when there are any.
    fn check_current_step(&mut self) -> Result<(), WizardError> {
        let errors = self.validate_current_step();
        if errors.is_empty() {
            self.errors.clear();
            Ok(())
        } else {
            self.errors = errors.clone();
            Err(WizardError::Invalid(errors))
        }
    }

    fn editable_field(&self, field_id: &str) -> Result<&'static WizardField, WizardError> {
        self.step_index()?;
        self.steps()
            .iter()
            .flat_map(|step| step.fields)
            .find(|field| field.id == field_id)
            .ok_or_else(|| WizardError::UnknownField(field_id.to_string()))
    }

    fn file_field(&self, field_id: &str) -> Result<&'static WizardField, WizardError> {
        let field = self.editable_field(field_id)?;
        if field.kind.is_file() {
            Ok(field)
        } else {
            Err(WizardError::NotAFileField(field_id.to_string()))
        }
    }
}

/// Holds the wizard in [`WizardPhase::Submitting`] while a request is in
/// flight and puts it back on its step when dropped, including when the
/// pending submission is cancelled.
struct SubmittingPhase<'a> {
    phase: &'a mut WizardPhase,
    step: usize,
}

impl<'a> SubmittingPhase<'a> {
    fn enter(phase: &'a mut WizardPhase, step: usize) -> Self {
        *phase = WizardPhase::Submitting;
        Self { phase, step }
    }
}

impl Drop for SubmittingPhase<'_> {
    fn drop(&mut self) {
        if *self.phase == WizardPhase::Submitting {
            *self.phase = WizardPhase::Step(self.step);
        }
    }
}
