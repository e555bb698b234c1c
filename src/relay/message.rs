//! Contact-form parsing, validation and the two HTML mail bodies.

use std::sync::LazyLock;

use regex::Regex;

use crate::relay::config::SENDER_NAME;
use crate::relay::error::ValidationError;

/// Request body as sent by the site; every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A form that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// All four fields must be non-empty, then the address must look like
    /// `local@domain.tld`.
    pub fn validate(self) -> Result<ContactMessage, ValidationError> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            present(self.name),
            present(self.email),
            present(self.subject),
            present(self.message),
        ) else {
            return Err(ValidationError::MissingFields);
        };
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(ContactMessage {
            name,
            email,
            subject,
            message,
        })
    }
}

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A fully addressed message, independent of the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

impl ContactMessage {
    /// The owner's copy, replying straight to the visitor.
    pub fn notification(&self, sender: &str, recipient: &str) -> OutgoingMail {
        OutgoingMail {
            from_name: SENDER_NAME.to_string(),
            from_address: sender.to_string(),
            to: recipient.to_string(),
            reply_to: Some(self.email.clone()),
            subject: format!("[网站留言] {}", self.subject),
            html: notification_html(self),
        }
    }

    pub fn auto_reply(&self, sender: &str, wechat: Option<&str>) -> OutgoingMail {
        OutgoingMail {
            from_name: SENDER_NAME.to_string(),
            from_address: sender.to_string(),
            to: self.email.clone(),
            reply_to: None,
            subject: "感谢你的留言！".to_string(),
            html: auto_reply_html(&self.name, wechat),
        }
    }
}

fn notification_html(msg: &ContactMessage) -> String {
    let name = escape_html(&msg.name);
    let email = escape_html(&msg.email);
    let subject = escape_html(&msg.subject);
    let message = escape_html(&msg.message);
    format!(
        r#"<div style="font-family: 'Microsoft YaHei', sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #8B5CF6; border-bottom: 2px solid #8B5CF6; padding-bottom: 10px;">📮 收到新的网站留言</h2>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 10px; margin: 20px 0;">
    <p style="margin: 10px 0;"><strong>👤 发送者：</strong>{name}</p>
    <p style="margin: 10px 0;"><strong>📧 邮箱：</strong><a href="mailto:{email}">{email}</a></p>
    <p style="margin: 10px 0;"><strong>📝 主题：</strong>{subject}</p>
  </div>
  <div style="background: #fff; padding: 20px; border: 1px solid #e9ecef; border-radius: 10px;">
    <h3 style="color: #333; margin-top: 0;">💬 留言内容：</h3>
    <p style="color: #555; line-height: 1.8; white-space: pre-wrap;">{message}</p>
  </div>
  <p style="color: #999; font-size: 12px; margin-top: 20px; text-align: center;">此邮件来自「{SENDER_NAME}」个人网站</p>
</div>"#
    )
}

fn auto_reply_html(name: &str, wechat: Option<&str>) -> String {
    let name = escape_html(name);
    let wechat_line = wechat
        .map(|id| {
            format!(
                "\n  <p style=\"color: #555; line-height: 1.8;\">如果有急事，也可以直接加我微信：<strong>{}</strong></p>",
                escape_html(id)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div style="font-family: 'Microsoft YaHei', sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #8B5CF6;">嗨 {name}，感谢你的留言！ 💜</h2>
  <p style="color: #555; line-height: 1.8;">我已经收到你的消息啦，会尽快回复你的～</p>{wechat_line}
  <p style="color: #999; font-size: 12px; margin-top: 30px;">来自「{SENDER_NAME}」</p>
</div>"#
    )
}

#[cfg(test)]
#[path = "../../tests/unit/relay/message.rs"]
mod tests;
