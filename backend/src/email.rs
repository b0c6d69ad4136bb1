//! Contact form validation and SMTP delivery.

use std::{path::Path, str::FromStr};

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const MAX_NAME_CHARS: usize = 200;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_MESSAGE_CHARS: usize = 5000;

/// Contact form body as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    /// Requester name.
    #[serde(default)]
    pub name: Option<String>,
    /// Reply address.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form message.
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated contact request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    /// Trimmed requester name.
    pub name: String,
    /// Trimmed, syntactically valid address.
    pub email: String,
    /// Trimmed message.
    pub message: String,
}

impl ContactRequest {
    /// Requires every field and enforces the length limits.
    pub fn validate(self) -> Result<ContactMessage> {
        let (Some(name), Some(email), Some(message)) = (
            normalize_optional_string(self.name),
            normalize_optional_string(self.email),
            normalize_optional_string(self.message),
        ) else {
            anyhow::bail!("All fields are required");
        };
        ensure_max_chars(&name, MAX_NAME_CHARS, "name")?;
        ensure_max_chars(&email, MAX_EMAIL_CHARS, "email")?;
        ensure_max_chars(&message, MAX_MESSAGE_CHARS, "message")?;
        let email = normalize_email(email)?;
        Ok(ContactMessage {
            name,
            email,
            message,
        })
    }
}

/// Delivers contact form submissions.
#[async_trait]
pub trait ContactMailer: Send + Sync {
    /// Notifies the site owner. Failure means the request was not delivered.
    async fn notify_owner(&self, contact: &ContactMessage) -> Result<()>;

    /// Sends the requester a confirmation.
    async fn confirm_requester(&self, contact: &ContactMessage) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
struct EmailAccountsConfig {
    mailbox: MailboxConfig,
    #[serde(default)]
    owner_recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MailboxConfig {
    #[serde(default)]
    smtp_host: Option<String>,
    #[serde(default)]
    smtp_port: Option<u16>,
    username: String,
    app_password: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// [`ContactMailer`] sending through one SMTP mailbox.
#[derive(Clone)]
pub struct SmtpContactMailer {
    from_mailbox: Mailbox,
    owner_recipient: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpContactMailer {
    /// Loads mailbox credentials from a JSON file. A missing file disables
    /// the contact form instead of failing startup.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::warn!(
                "contact mailer disabled: credentials file not found at {}",
                path.display()
            );
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read email accounts file {}", path.display()))?;
        let config: EmailAccountsConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid email accounts JSON: {}", path.display()))?;
        let mailer = Self::build(config)?;
        tracing::info!("contact mailer enabled using credentials file {}", path.display());
        Ok(Some(mailer))
    }

    fn build(config: EmailAccountsConfig) -> Result<Self> {
        let username = normalize_required_string(config.mailbox.username, "mailbox.username")?;
        let password =
            normalize_app_password(config.mailbox.app_password, "mailbox.app_password")?;
        let smtp_host = normalize_optional_string(config.mailbox.smtp_host)
            .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let smtp_port = config.mailbox.smtp_port.unwrap_or(DEFAULT_SMTP_PORT);

        let sender_email = normalize_email(username)?;
        let owner_recipient = match normalize_optional_string(config.owner_recipient) {
            Some(value) => normalize_email(value)?,
            None => sender_email.clone(),
        };
        let display_name = normalize_optional_string(config.mailbox.display_name)
            .unwrap_or_else(|| "Blog".to_string());
        let from_mailbox = Mailbox::from_str(&format!("{display_name} <{sender_email}>"))
            .context("invalid sender mailbox")?;

        let credentials = Credentials::new(sender_email, password);
        let builder = if smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_host)
                .with_context(|| format!("invalid smtp relay host: {smtp_host}"))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_host)
                .with_context(|| format!("invalid smtp starttls host: {smtp_host}"))?
        };
        let mailer = builder.port(smtp_port).credentials(credentials).build();

        Ok(Self {
            from_mailbox,
            owner_recipient,
            mailer,
        })
    }

    async fn send_plain_text_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to_mailbox =
            Mailbox::from_str(to).with_context(|| format!("invalid recipient: {to}"))?;
        let email = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string())
            .context("failed to build email message")?;
        self.mailer
            .send(email)
            .await
            .context("failed to send email via SMTP")?;
        Ok(())
    }
}

#[async_trait]
impl ContactMailer for SmtpContactMailer {
    async fn notify_owner(&self, contact: &ContactMessage) -> Result<()> {
        let (subject, body) = owner_notification(contact);
        self.send_plain_text_email(&self.owner_recipient, &subject, &body)
            .await
    }

    async fn confirm_requester(&self, contact: &ContactMessage) -> Result<()> {
        let (subject, body) = requester_confirmation(contact);
        self.send_plain_text_email(&contact.email, &subject, &body)
            .await
    }
}

/// Subject and body of the mail to the site owner.
pub fn owner_notification(contact: &ContactMessage) -> (String, String) {
    let subject = format!("New contact request from {}", contact.name);
    let body = format!(
        "New contact request submitted.\n\nName: {}\nEmail: {}\nMessage:\n{}\n",
        contact.name, contact.email, contact.message
    );
    (subject, body)
}

/// Subject and body of the confirmation to the requester.
pub fn requester_confirmation(contact: &ContactMessage) -> (String, String) {
    let subject = "Thanks for reaching out".to_string();
    let body = format!(
        "Hello, {}!\n\nWe received your request and will get back to you shortly.\n\nYour \
         message:\n{}\n",
        contact.name, contact.message
    );
    (subject, body)
}

fn ensure_max_chars(value: &str, max: usize, field_name: &str) -> Result<()> {
    if value.chars().count() > max {
        anyhow::bail!("`{field_name}` must be <= {max} chars");
    }
    Ok(())
}

fn normalize_optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn normalize_required_string(value: String, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{field_name} is required");
    }
    Ok(trimmed.to_string())
}

fn normalize_email(value: String) -> Result<String> {
    let trimmed = value.trim();
    Mailbox::from_str(trimmed).with_context(|| format!("invalid email address: {trimmed}"))?;
    Ok(trimmed.to_string())
}

fn normalize_app_password(value: String, field_name: &str) -> Result<String> {
    let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        anyhow::bail!("{field_name} is required");
    }
    Ok(compact)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn validate_trims_and_accepts_complete_request() {
        let contact = request(" Ada ", "ada@example.com ", "Need a WMS audit")
            .validate()
            .expect("valid request");
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.email, "ada@example.com");
    }

    #[test]
    fn validate_requires_every_field() {
        let err = request("Ada", "  ", "hi").validate().expect_err("missing email");
        assert_eq!(err.to_string(), "All fields are required");
        assert!(ContactRequest::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_email() {
        assert!(request("Ada", "not-email", "hi").validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_message() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let err = request("Ada", "ada@example.com", &long)
            .validate()
            .expect_err("too long");
        assert!(err.to_string().contains("`message` must be <= 5000 chars"));
    }

    #[test]
    fn owner_notification_includes_requester_details() {
        let contact = request("Ada", "ada@example.com", "Line one\nLine two")
            .validate()
            .expect("valid");
        let (subject, body) = owner_notification(&contact);
        assert_eq!(subject, "New contact request from Ada");
        assert!(body.contains("Email: ada@example.com"));
        assert!(body.contains("Line one\nLine two"));
    }

    #[test]
    fn missing_config_file_disables_mailer() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mailer =
            SmtpContactMailer::from_file(&dir.path().join("absent.json")).expect("no error");
        assert!(mailer.is_none());
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"mailbox": {"username": "", "app_password": "x"}}"#)
            .expect("write config");
        assert!(SmtpContactMailer::from_file(file.path()).is_err());
    }
}
