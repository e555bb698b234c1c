//! Contact-form mail relay: `POST /api/send-email`.
//!
//! Requests are validated, forwarded to the site owner as an HTML notification and
//! answered with a best-effort auto-reply to the visitor. User-facing messages are
//! Chinese, matching the site.

pub mod config;
pub mod error;
pub mod mailer;
pub mod message;
pub mod server;

pub use config::MailConfig;
pub use error::{RelayError, TransportKind, ValidationError};
pub use mailer::{Mailer, SmtpMailer};
pub use message::{ContactForm, ContactMessage, OutgoingMail};
pub use server::{AppState, SEND_EMAIL_PATH, router};
