//! Mail transport seam: [`Mailer`] in front of lettre's async SMTP client.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::relay::config::MailConfig;
use crate::relay::error::{RelayError, TransportKind};
use crate::relay::message::OutgoingMail;

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), RelayError>;
}

/// SMTP delivery. Built without credentials it refuses every send.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, RelayError> {
        let Ok(creds) = config.credentials() else {
            tracing::warn!("EMAIL_USER / EMAIL_PASS not set; sends will fail");
            return Ok(Self { transport: None });
        };

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| RelayError::InvalidConfig(format!("smtp host {}: {e}", config.host)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(creds.user, creds.pass))
            .timeout(Some(SMTP_TIMEOUT))
            .build();
        tracing::debug!(host = %config.host, port = config.port, secure = config.secure, "smtp transport ready");
        Ok(Self {
            transport: Some(transport),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), RelayError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(RelayError::MissingCredentials)?;
        let message = build_message(mail)?;
        transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;
        Ok(())
    }
}

pub fn build_message(mail: &OutgoingMail) -> Result<Message, RelayError> {
    let mailbox = |name: Option<&str>, address: &str| -> Result<Mailbox, RelayError> {
        let address: Address = address
            .parse()
            .map_err(|e| RelayError::Message(format!("{address:?}: {e}")))?;
        Ok(Mailbox::new(name.map(str::to_string), address))
    };

    let mut builder = Message::builder()
        .from(mailbox(Some(mail.from_name.as_str()), &mail.from_address)?)
        .to(mailbox(None, &mail.to)?)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_HTML);
    if let Some(reply_to) = &mail.reply_to {
        builder = builder.reply_to(mailbox(None, reply_to)?);
    }
    builder
        .body(mail.html.clone())
        .map_err(|e| RelayError::Message(e.to_string()))
}

fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> RelayError {
    let status = err
        .status()
        .and_then(|code| code.to_string().parse::<u16>().ok());
    let kind = TransportKind::classify(status, err.is_timeout(), io_error_kind(err));
    tracing::warn!(?kind, ?status, %err, "smtp send failed");
    RelayError::transport(kind, err.to_string())
}

fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<std::io::ErrorKind> {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = e.source();
    }
    None
}
