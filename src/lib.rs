//! # weir
//!
//! A small HTTP framework for Rust services: a declared-order middleware
//! chain, a typed service registry and radix-tree routing on hyper.
//!
//! ## The pipeline
//!
//! ```text
//! request → trace → recover → … → Router → handler
//!                                            ↓ req.resolve::<C>()
//!                                       request Scope → ServiceProvider
//! ```
//!
//! - Routing: one [`matchit`] tree per method, `{name}` captures,
//!   static segments win over captures.
//! - Middleware: async functions around a [`Next`](middleware::Next)
//!   continuation; run before and after the rest of the chain, short-circuit,
//!   or translate errors.
//! - Services: capabilities registered as transient, scoped (one per
//!   request) or singleton; handlers resolve them by tag type.
//! - Serving: tokio + hyper (HTTP/1.1 and HTTP/2), graceful shutdown on
//!   SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weir::services::{Capability, ServiceCollection};
//! use weir::{App, Error, Request, Router, Server, middleware};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! struct Plain;
//! impl Greeter for Plain {
//!     fn greet(&self, name: &str) -> String { format!("hello, {name}") }
//! }
//!
//! struct Greeting;
//! impl Capability for Greeting {
//!     type Service = dyn Greeter;
//!     const NAME: &'static str = "greeting";
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let services = ServiceCollection::new()
//!         .transient::<Greeting, _>(|_| Ok(Arc::new(Plain)))
//!         .build();
//!
//!     let app = App::builder(Router::new().get("/greet/{name}", greet))
//!         .layer(middleware::trace)
//!         .layer(middleware::recover)
//!         .services(services)
//!         .build();
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn greet(req: Request) -> Result<String, Error> {
//!     let greeter = req.resolve::<Greeting>()?;
//!     Ok(greeter.greet(req.param("name").unwrap_or("stranger")))
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod health;
pub mod lessons;
pub mod middleware;
pub mod services;
pub mod storefront;

pub use app::{App, AppBuilder};
pub use error::Error;
pub use handler::{BoxFuture, Handler, HandlerResult, IntoHandlerResult};
pub use http::StatusCode;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::{RouteMatch, Router};
pub use server::Server;
