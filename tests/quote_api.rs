use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use m2_studio::domain::attachment::Attachment;
use m2_studio::domain::form_values::FieldValue;
use m2_studio::domain::project_type::ProjectType;
use m2_studio::mailer::UnconfiguredMailer;
use m2_studio::wizard::http::HttpQuoteSubmitter;
use m2_studio::wizard::{Advance, QuoteWizard, SubmitError, WizardError, WizardPhase};

mod common;

use common::{RecordingMailer, spawn_app, test_config};

async fn fill_house(wizard: &mut QuoteWizard, submitter: &HttpQuoteSubmitter) {
    wizard.select_project_type(ProjectType::House);
    wizard.set_field_value("location", "Prnjavor".into()).unwrap();
    wizard.set_field_value("area", FieldValue::Number(180.0)).unwrap();
    wizard.set_field_value("floors", "ground".into()).unwrap();
    assert_eq!(wizard.advance(submitter).await.unwrap(), Advance::Moved(1));

    wizard.set_field_value("services", vec!["concept"].into()).unwrap();
    wizard.set_field_value("timeline", "flexible".into()).unwrap();
    assert_eq!(wizard.advance(submitter).await.unwrap(), Advance::Moved(2));

    wizard.set_field_value("fullName", "Marko Petrović".into()).unwrap();
    wizard.set_field_value("email", "marko@example.com".into()).unwrap();
}

#[actix_web::test]
async fn wizard_submission_reaches_the_studio_inbox() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = spawn_app(mailer.clone(), test_config());
    let submitter = HttpQuoteSubmitter::new(format!("{base}/api/quote"));

    let mut wizard = QuoteWizard::new();
    fill_house(&mut wizard, &submitter).await;
    let sketch = Attachment::new("skica.pdf", Some("application/pdf".into()), b"%PDF-1.4".to_vec())
        .unwrap();
    wizard.add_file("attachments", sketch).unwrap();

    let outcome = wizard.advance(&submitter).await.unwrap();

    let Advance::Submitted(ack) = outcome else {
        panic!("expected the request to be submitted");
    };
    assert_eq!(
        ack.message,
        "Vaš upit je uspješno poslan. Kontaktiraćemo vas u najkraćem mogućem roku."
    );
    assert_eq!(wizard.phase(), WizardPhase::Submitted);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert!(email.subject.starts_with("[UPIT] Kuća (novogradnja) - "));
    assert!(email.text_body.contains("Location: Prnjavor\n"));
    assert!(email.text_body.contains("Area: 180\n"));
    assert!(email.text_body.contains("Floors: ground\n"));
    assert!(email.text_body.contains("Services: concept\n"));
    assert!(email.text_body.contains("Timeline: flexible\n"));
    assert!(email.text_body.contains("Full Name: Marko Petrović\n"));
    assert_eq!(email.reply_to.as_ref().unwrap().as_str(), "marko@example.com");
    assert_eq!(email.attachments.len(), 1);
    assert_eq!(email.attachments[0].filename.as_str(), "skica.pdf");
    assert_eq!(
        email.attachments[0].content_type.as_deref(),
        Some("application/pdf")
    );
    assert_eq!(email.attachments[0].bytes, b"%PDF-1.4");
}

#[actix_web::test]
async fn unconfigured_relay_keeps_the_wizard_on_the_last_step() {
    let base = spawn_app(Arc::new(UnconfiguredMailer), test_config());
    let submitter = HttpQuoteSubmitter::new(format!("{base}/api/quote"));

    let mut wizard = QuoteWizard::new();
    fill_house(&mut wizard, &submitter).await;

    let result = wizard.advance(&submitter).await;

    match result {
        Err(WizardError::Submission(SubmitError::Rejected { status, message })) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Email servis nije konfigurisan.");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(wizard.phase(), WizardPhase::Step(2));
    assert_eq!(wizard.submit_error(), Some("Email servis nije konfigurisan."));
    assert_eq!(wizard.values().len(), 7);
}

#[actix_web::test]
async fn request_without_data_is_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = spawn_app(mailer.clone(), test_config());

    let form = Form::new().part(
        "file_0",
        Part::bytes(b"%PDF".to_vec()).file_name("skica.pdf"),
    );
    let response = reqwest::Client::new()
        .post(format!("{base}/api/quote"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Missing form data"}));
    assert!(mailer.sent().is_empty());
}

#[actix_web::test]
async fn malformed_data_is_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = spawn_app(mailer.clone(), test_config());

    let form = Form::new().text("data", "{\"projectType\": ");
    let response = reqwest::Client::new()
        .post(format!("{base}/api/quote"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Neispravni podaci forme.");
    assert!(mailer.sent().is_empty());
}

#[actix_web::test]
async fn oversized_attachment_is_refused() {
    let mailer = Arc::new(RecordingMailer::default());
    let mut config = test_config();
    config.max_attachment_bytes = 16;
    let base = spawn_app(mailer.clone(), config);

    let data = json!({
        "projectType": "interior",
        "formData": {"fullName": "Ana", "email": "ana@example.com"}
    });
    let form = Form::new()
        .text("data", data.to_string())
        .part("file_0", Part::bytes(vec![7u8; 64]).file_name("plan.png"));
    let response = reqwest::Client::new()
        .post(format!("{base}/api/quote"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Priloženi fajlovi premašuju dozvoljenu veličinu. Dozvoljeno je najviše 10 fajlova, \
         do 16 B po fajlu i 25MB ukupno."
    );
    assert!(mailer.sent().is_empty());
}

#[actix_web::test]
async fn unknown_project_type_is_labelled_with_its_tag() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = spawn_app(mailer.clone(), test_config());

    let data = json!({
        "projectType": "garage",
        "formData": {"contactEmail": "vlasnik@example.com", "notes": "Dvije garaže"}
    });
    let response = reqwest::Client::new()
        .post(format!("{base}/api/quote"))
        .multipart(Form::new().text("data", data.to_string()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let sent = mailer.sent();
    assert!(sent[0].subject.starts_with("[UPIT] garage - "));
    assert_eq!(
        sent[0].reply_to.as_ref().unwrap().as_str(),
        "vlasnik@example.com"
    );
    assert!(sent[0].attachments.is_empty());
}
