#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use m2_studio::domain::email::QuoteEmail;
use m2_studio::mailer::{MailError, QuoteMailer};
use m2_studio::models::config::ServerConfig;

/// Mailer keeping every email it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<QuoteEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<QuoteEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl QuoteMailer for RecordingMailer {
    fn send_quote(&self, email: &QuoteEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        smtp_host: "smtp.example.com".to_string(),
        smtp_port: 587,
        smtp_user: None,
        smtp_pass: None,
        mail_to: "studio@example.com".to_string(),
        mail_from_name: "M² Architecture".to_string(),
        max_attachment_bytes: 5 * 1024 * 1024,
        max_attachments: 10,
        max_total_attachment_bytes: 25 * 1024 * 1024,
        allowed_origin: None,
    }
}

/// Starts the service on an ephemeral port and returns its base URL.
pub fn spawn_app(mailer: Arc<dyn QuoteMailer>, config: ServerConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = m2_studio::serve(listener, mailer, &config).unwrap();
    actix_web::rt::spawn(server);
    format!("http://127.0.0.1:{port}")
}
