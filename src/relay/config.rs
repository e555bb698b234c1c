use crate::relay::error::RelayError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.163.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
/// Display name on every outgoing message.
pub const SENDER_NAME: &str = "我的小天地";

/// Mail settings read from the environment.
///
/// Credentials stay optional here: a relay without them still starts and answers
/// every send attempt with a configuration error.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Owner inbox; falls back to `user`.
    pub to: Option<String>,
    pub host: String,
    pub port: u16,
    /// Implicit TLS; otherwise STARTTLS.
    pub secure: bool,
    /// WeChat id offered in the auto-reply, if any.
    pub wechat: Option<String>,
}

/// Username and password, both present and non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub user: String,
    pub pass: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    ///
    /// `SMTP_SECURE` is `true` only for the literal `"true"`; when unset it follows
    /// the port (465 means implicit TLS).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match var("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                RelayError::InvalidConfig(format!("SMTP_PORT must be a port number, got {raw:?}"))
            })?,
            None => DEFAULT_SMTP_PORT,
        };
        let secure = match var("SMTP_SECURE") {
            Some(v) => v == "true",
            None => port == 465,
        };

        Ok(Self {
            user: var("EMAIL_USER"),
            pass: var("EMAIL_PASS"),
            to: var("EMAIL_TO"),
            host: var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port,
            secure,
            wechat: var("CONTACT_WECHAT"),
        })
    }

    pub fn credentials(&self) -> Result<SmtpCredentials, RelayError> {
        match (&self.user, &self.pass) {
            (Some(user), Some(pass)) => Ok(SmtpCredentials {
                user: user.clone(),
                pass: pass.clone(),
            }),
            _ => Err(RelayError::MissingCredentials),
        }
    }

    pub fn recipient(&self) -> Option<&str> {
        self.to.as_deref().or(self.user.as_deref())
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .field("to", &self.to)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("wechat", &self.wechat)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/relay/config.rs"]
mod tests;
