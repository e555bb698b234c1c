//! HTTP surface of the relay.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;

use crate::relay::config::MailConfig;
use crate::relay::error::{MSG_GENERIC_FAILURE, MSG_METHOD_NOT_ALLOWED, MSG_SENT, RelayError};
use crate::relay::mailer::Mailer;
use crate::relay::message::ContactForm;

pub const SEND_EMAIL_PATH: &str = "/api/send-email";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MailConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: MailConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// JSON envelope for every non-OPTIONS answer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            error_code: None,
        }
    }

    fn failure(message: impl Into<String>, error_code: Option<&'static str>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SEND_EMAIL_PATH, any(send_email))
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, path = SEND_EMAIL_PATH, "relay listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[tracing::instrument(skip_all, fields(method = %method))]
async fn send_email(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return reply(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiResponse::failure(MSG_METHOD_NOT_ALLOWED, None),
        );
    }

    let form = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            tracing::warn!(%err, "rejecting unreadable body");
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure(MSG_GENERIC_FAILURE, None),
            );
        }
    };
    let contact = match form.validate() {
        Ok(contact) => contact,
        Err(err) => {
            tracing::debug!(%err, "form rejected");
            return reply(StatusCode::BAD_REQUEST, ApiResponse::failure(err.to_string(), None));
        }
    };

    match deliver(&state, contact).await {
        Ok(()) => reply(StatusCode::OK, ApiResponse::ok(MSG_SENT)),
        Err(err) => {
            tracing::warn!(%err, code = ?err.code(), "send failed");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failure(err.client_message(), err.code()),
            )
        }
    }
}

// An empty body reads as an empty form.
fn parse_form(body: &[u8]) -> Result<ContactForm, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactForm::default());
    }
    serde_json::from_slice(body).map_err(|e| RelayError::Body(e.to_string()))
}

async fn deliver(
    state: &AppState,
    contact: crate::relay::message::ContactMessage,
) -> Result<(), RelayError> {
    let creds = state.config.credentials()?;
    let recipient = state.config.recipient().unwrap_or(&creds.user);

    let notification = contact.notification(&creds.user, recipient);
    state.mailer.send(&notification).await?;
    tracing::info!(to = recipient, "contact message relayed");

    let auto_reply = contact.auto_reply(&creds.user, state.config.wechat.as_deref());
    let mailer = Arc::clone(&state.mailer);
    tokio::spawn(async move {
        if let Err(err) = mailer.send(&auto_reply).await {
            tracing::warn!(%err, to = %auto_reply.to, "auto-reply failed");
        }
    });
    Ok(())
}

fn reply(status: StatusCode, body: ApiResponse) -> Response {
    (status, Json(body)).into_response()
}
