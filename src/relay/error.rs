//! Relay failures and the user-facing messages they map to.

pub const MSG_SENT: &str = "留言发送成功";
pub const MSG_METHOD_NOT_ALLOWED: &str = "方法不允许";
pub const MSG_MISSING_FIELDS: &str = "请填写所有必填项";
pub const MSG_INVALID_EMAIL: &str = "邮箱格式不正确";
pub const MSG_GENERIC_FAILURE: &str = "发送失败，请稍后重试";
pub const MSG_MISSING_CREDENTIALS: &str = "服务端未配置邮箱环境变量（EMAIL_USER / EMAIL_PASS）";
pub const MSG_AUTH_FAILED: &str = "SMTP 认证失败：请检查 163 邮箱授权码是否正确";
pub const MSG_CONNECTION_FAILED: &str =
    "邮件服务连接失败：可能是 Vercel 环境限制 SMTP 出站端口（建议改用邮件服务的 HTTP API）";

/// Broad cause of an SMTP failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Auth,
    Connection,
    Timeout,
    Socket,
    Other,
}

impl TransportKind {
    /// Nodemailer-style error code reported to clients.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Self::Auth => Some("EAUTH"),
            Self::Connection => Some("ECONNECTION"),
            Self::Timeout => Some("ETIMEDOUT"),
            Self::Socket => Some("ESOCKET"),
            Self::Other => None,
        }
    }

    /// Classify from the SMTP reply code, the timeout flag and the underlying io
    /// error, in that order of precedence.
    pub fn classify(
        status: Option<u16>,
        timed_out: bool,
        io: Option<std::io::ErrorKind>,
    ) -> Self {
        use std::io::ErrorKind;

        if matches!(status, Some(530 | 534 | 535)) {
            return Self::Auth;
        }
        if timed_out {
            return Self::Timeout;
        }
        match io {
            Some(ErrorKind::TimedOut) => Self::Timeout,
            Some(
                ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionAborted
                | ErrorKind::NotFound
                | ErrorKind::AddrNotAvailable
                | ErrorKind::HostUnreachable
                | ErrorKind::NetworkUnreachable,
            ) => Self::Connection,
            Some(_) => Self::Socket,
            None => Self::Other,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("Missing EMAIL_USER or EMAIL_PASS")]
    MissingCredentials,

    #[error("invalid relay configuration: {0}")]
    InvalidConfig(String),

    #[error("smtp transport error ({kind:?}): {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("malformed request body: {0}")]
    Body(String),
}

impl RelayError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Transport { kind, .. } => kind.code(),
            _ => None,
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => MSG_MISSING_CREDENTIALS,
            Self::Transport {
                kind: TransportKind::Auth,
                ..
            } => MSG_AUTH_FAILED,
            Self::Transport {
                kind: TransportKind::Connection | TransportKind::Timeout | TransportKind::Socket,
                ..
            } => MSG_CONNECTION_FAILED,
            _ => MSG_GENERIC_FAILURE,
        }
    }
}

/// Rejected form input; the display text is the client message.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("请填写所有必填项")]
    MissingFields,

    #[error("邮箱格式不正确")]
    InvalidEmail,
}
