//! Route handlers and their erased form.
//!
//! Every `async fn` is its own type, yet one matchit tree per method has to
//! hold all of them. Registration therefore wraps each handler once and
//! keeps it as `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn greet(req: Request) -> Result<String, Error> { … }  ← user writes this
//!        ↓ router.get("/greet/{name}", greet)
//! greet.into_boxed_handler()                                  ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(greet))                                  ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time                          ← one vtable dispatch
//!        ↓
//! Box::pin(async { greet(req).await.into_handler_result() })  ← BoxFuture
//! ```
//!
//! A handler's output is anything [`IntoHandlerResult`]: every
//! [`IntoResponse`] type, or a `Result` whose error converts into
//! [`Error`]. Errors are not turned into responses here; they travel up the
//! middleware chain as `Err` until a link such as
//! [`middleware::recover`](crate::middleware::recover) handles them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Types ─────────────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future.
///
/// `Send + 'static` lets tokio move the future across worker threads.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a handler or middleware link produces: a response, or an error for
/// an outer link to translate.
pub type HandlerResult = Result<Response, Error>;

/// Object-safe call interface behind [`BoxedHandler`]. Public only because
/// `Handler::into_boxed_handler` names it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture<HandlerResult>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Handler output ────────────────────────────────────────────────────────────

/// Conversion of a handler's return value into a [`HandlerResult`].
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl<T: IntoResponse> IntoHandlerResult for T {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self.into_response())
    }
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoResponse,
    E: Into<Error>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map(IntoResponse::into_response).map_err(Into::into)
    }
}

// ── Handler ───────────────────────────────────────────────────────────────────

/// Any function usable as a route handler.
///
/// Satisfied by every `async fn` (or closure returning a future) shaped like
///
/// ```text
/// async fn name(req: Request) -> impl IntoHandlerResult
/// ```
///
/// Sealed; downstream crates cannot add impls.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Erasure ───────────────────────────────────────────────────────────────────

/// Concrete handler `F` adapted to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<HandlerResult> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_handler_result() })
    }
}
