//! Built-in health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the instance serve traffic? Failure → pulled from the load balancer. |
//!
//! ```rust
//! use weir::{Router, health};
//!
//! let router = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```
//!
//! Replace `readiness` with your own handler to gate on dependencies; a
//! handler can check that its services resolve:
//!
//! ```rust
//! use weir::{Request, Response, StatusCode};
//!
//! async fn readiness(req: Request) -> Response {
//!     if req.services().provider().is_empty() {
//!         Response::status(StatusCode::SERVICE_UNAVAILABLE)
//!     } else {
//!         Response::text("ready")
//!     }
//! }
//! ```

use crate::{Request, Response};

/// Liveness probe: always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe (default): `200 OK` with body `"ready"`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
