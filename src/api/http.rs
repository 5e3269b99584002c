//! axum adapter: turns HTTP requests into dispatcher [`Request`]s and
//! dispatcher [`Response`]s back into HTTP responses.

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use tracing::info;

use super::{DispatchError, Dispatcher, Method, Request, RequestBody, Response, Status};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Build the HTTP application. Every request goes through the dispatcher's
/// own route table, so axum only provides a fallback.
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .fallback(handle)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(dispatcher)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, dispatcher: Dispatcher) -> Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!(%addr, "listening");

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn handle(
    State(dispatcher): State<Dispatcher>,
    method: axum::http::Method,
    uri: Uri,
    body: Bytes,
) -> axum::response::Response {
    let response = match decode_body(&body) {
        Ok(body) => {
            let request = Request::new(Method::parse(method.as_str()), uri.path(), body);
            dispatcher.dispatch(request)
        }
        Err(err) => Response::from_error(&err),
    };
    render(response)
}

/// An empty body decodes to an empty field set.
fn decode_body(bytes: &[u8]) -> Result<RequestBody, DispatchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RequestBody::default());
    }
    Ok(serde_json::from_slice(bytes)?)
}

fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Ok => StatusCode::OK,
        Status::BadRequest => StatusCode::BAD_REQUEST,
        Status::NotFound => StatusCode::NOT_FOUND,
        Status::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render(response: Response) -> axum::response::Response {
    let (status, payload) = match serde_json::to_vec(&response.body) {
        Ok(payload) => (status_code(response.status), payload),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("\"{}\"", super::INTERNAL_ERROR_MESSAGE).into_bytes(),
            )
        }
    };
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], payload).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_body(b"").unwrap(), RequestBody::default());
        assert_eq!(decode_body(b"  \n").unwrap(), RequestBody::default());
    }

    #[test]
    fn test_decode_amount() {
        let body = decode_body(br#"{"amount": 500}"#).unwrap();
        assert_eq!(body.amount, Some(Decimal::from(500)));
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_body(b"{not json").unwrap_err();
        assert!(matches!(err, DispatchError::MalformedBody(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_code(Status::Ok), StatusCode::OK);
        assert_eq!(status_code(Status::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_code(Status::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_code(Status::InternalError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
