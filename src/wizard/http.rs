//! `reqwest`-backed submitter posting to the quote endpoint.

use reqwest::multipart::{Form, Part};

use crate::domain::submission::{DATA_FIELD, QuoteSubmission};
use crate::wizard::submit::{
    GENERIC_SUBMIT_ERROR, QuoteSubmitter, SubmitAck, SubmitError, SubmitResponse,
};

/// Sends submissions as `multipart/form-data`: the JSON payload under `data`
/// and each attachment as `file_<index>`.
#[derive(Clone, Debug)]
pub struct HttpQuoteSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuoteSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(submission: &QuoteSubmission) -> Result<Form, SubmitError> {
        let data = serde_json::to_string(&submission.data)
            .map_err(|err| SubmitError::Transport(format!("cannot encode payload: {err}")))?;

        let mut form = Form::new().text(DATA_FIELD, data);
        for (name, attachment) in submission
            .file_field_names()
            .zip(submission.attachments.iter())
        {
            let part =
                Part::bytes(attachment.bytes.clone()).file_name(attachment.filename.to_string());
            let part = match attachment.content_type.as_deref() {
                Some(content_type) => part
                    .mime_str(content_type)
                    .map_err(|err| SubmitError::Transport(err.to_string()))?,
                None => part,
            };
            form = form.part(name, part);
        }

        Ok(form)
    }
}

impl QuoteSubmitter for HttpQuoteSubmitter {
    async fn submit(&self, submission: &QuoteSubmission) -> Result<SubmitAck, SubmitError> {
        let form = Self::build_form(submission)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let status = response.status();
        let body: SubmitResponse = response.json().await.unwrap_or_default();

        if status.is_success() && body.success {
            return Ok(SubmitAck {
                message: body.message.unwrap_or_default(),
            });
        }

        log::debug!("Quote endpoint answered {status}");
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message: body
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SUBMIT_ERROR.to_string()),
        })
    }
}
