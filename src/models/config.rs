//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forms::quote::AttachmentLimits;
use crate::mailer::MailConfig;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the quote service.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub mail_to: String,
    pub mail_from_name: String,
    pub max_attachment_bytes: usize,
    pub max_attachments: usize,
    pub max_total_attachment_bytes: usize,
    /// Site origin allowed by CORS; any origin when unset.
    pub allowed_origin: Option<String>,
}

impl ServerConfig {
    /// Layers `config/default.yaml`, `config/{app_env}.yaml`, `APP_*` variables
    /// and the plain `SMTP_*` / `MAIL_*` variables, later sources winning.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .add_source(Environment::with_prefix("SMTP").keep_prefix(true))
            .add_source(Environment::with_prefix("MAIL").keep_prefix(true))
            .build()?
            .try_deserialize()
    }

    pub fn mail(&self) -> MailConfig {
        MailConfig {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            user: self.smtp_user.clone(),
            pass: self.smtp_pass.clone(),
            from_name: self.mail_from_name.clone(),
            to: self.mail_to.clone(),
        }
    }

    pub fn limits(&self) -> AttachmentLimits {
        AttachmentLimits {
            max_file_bytes: self.max_attachment_bytes,
            max_files: self.max_attachments,
            max_total_bytes: self.max_total_attachment_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const DEFAULTS: &str = include_str!("../../config/default.yaml");

    #[test]
    fn defaults_deserialize() {
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.smtp_user, None);
        assert_eq!(config.limits(), AttachmentLimits::default());
        assert_eq!(config.mail().from_name, "M² Architecture");
    }
}
