//! Request logging link.

use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use super::Next;
use crate::handler::HandlerResult;
use crate::request::Request;

/// Logs every request on the way in and its outcome on the way out.
///
/// Runs the rest of the chain inside a `request` span carrying the method
/// and path, so everything logged by inner links and handlers is tagged
/// with them. Register it first to time the whole pipeline.
pub async fn trace(req: Request, next: Next) -> HandlerResult {
    let span = info_span!("request", method = %req.method(), path = %req.path());

    async move {
        let started = Instant::now();
        info!("request received");

        let result = next.run(req).await;
        let latency = started.elapsed();

        match &result {
            Ok(res) => info!(status = res.status_code().as_u16(), ?latency, "response sent"),
            Err(e) => warn!(error = %e, ?latency, "request failed"),
        }
        result
    }
    .instrument(span)
    .await
}
