//! Error-translation link.

use std::any::Any;

use http::StatusCode;
use tracing::{Instrument, error};

use super::Next;
use crate::handler::HandlerResult;
use crate::request::Request;
use crate::response::Response;

/// Body of the response produced for an unhandled error.
pub const INTERNAL_ERROR_BODY: &str = "An internal server error occurred";

/// Catches every error raised further in, logs it once, and answers
/// `500 Internal Server Error` with [`INTERNAL_ERROR_BODY`].
///
/// The rest of the chain runs as its own task, so a panicking handler is
/// caught here too instead of tearing down the connection. The task stays
/// inside the caller's span.
pub async fn recover(req: Request, next: Next) -> HandlerResult {
    let outcome = match tokio::spawn(next.run(req).in_current_span()).await {
        Ok(Ok(res)) => return Ok(res),
        Ok(Err(e)) => e.to_string(),
        Err(join) if join.is_panic() => panic_message(join.into_panic()),
        Err(join) => join.to_string(),
    };

    error!(error = %outcome, "unhandled error");
    Ok(Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .text(INTERNAL_ERROR_BODY))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("handler panicked: {msg}")
    } else {
        "handler panicked".to_owned()
    }
}
