//! Middleware chain.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: request logging, error translation, header
//! inspection. A link is any async function taking the request and a
//! [`Next`] continuation:
//!
//! ```rust
//! use weir::{HandlerResult, Request, Response, StatusCode};
//! use weir::middleware::Next;
//!
//! async fn require_key(req: Request, next: Next) -> HandlerResult {
//!     if req.header("x-api-key").is_none() {
//!         // short-circuit: the rest of the chain never runs
//!         return Ok(Response::status(StatusCode::UNAUTHORIZED));
//!     }
//!     let mut res = next.run(req).await?;
//!     res.headers_mut().insert("x-checked", "1".parse().unwrap());
//!     Ok(res)
//! }
//! ```
//!
//! Links run in the order they are registered: the first one added is the
//! outermost, sees the request first and the response last. The innermost
//! link hands the request to the [`Router`].
//!
//! Built-in links:
//! - [`trace`]: per-request span with method, path, status, latency
//! - [`recover`]: turns errors and panics from inner links into `500`

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, HandlerResult};
use crate::request::Request;
use crate::router::Router;

mod recover;
mod trace;

pub use recover::{INTERNAL_ERROR_BODY, recover};
pub use trace::trace;

// ── Erasure ───────────────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, next: Next) -> BoxFuture<HandlerResult>;
}

#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware link.
///
/// Sealed like [`Handler`](crate::Handler): satisfied automatically by any
///
/// ```text
/// async fn name(req: Request, next: Next) -> HandlerResult
/// ```
///
/// and by closures of the same shape, which is how a link carries state.
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture<HandlerResult> {
        Box::pin((self.0)(req, next))
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// The frozen pipeline: links in declared order, then the router.
pub(crate) struct Chain {
    pub(crate) links: Vec<BoxedMiddleware>,
    pub(crate) router: Router,
}

/// The rest of the chain, handed to each link.
///
/// Calling [`Next::run`] delegates inward; dropping it without calling
/// short-circuits everything after the current link.
pub struct Next {
    chain: Arc<Chain>,
    index: usize,
}

impl Next {
    pub(crate) fn start(chain: Arc<Chain>) -> Self {
        Self { chain, index: 0 }
    }

    /// Runs the remaining links and, after the last one, the router.
    pub async fn run(self, req: Request) -> HandlerResult {
        let Self { chain, index } = self;
        match chain.links.get(index) {
            Some(link) => {
                let link = Arc::clone(link);
                link.call(req, Next { chain, index: index + 1 }).await
            }
            None => chain.router.dispatch(req).await,
        }
    }

    /// Number of links still ahead, not counting the router.
    pub fn remaining(&self) -> usize {
        self.chain.links.len().saturating_sub(self.index)
    }
}
