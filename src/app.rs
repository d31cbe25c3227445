//! Pipeline assembly: router, middleware links and services in one value.

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use tracing::error;

use crate::middleware::{Chain, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::services::ServiceProvider;

/// A fully assembled application.
///
/// Cloning is cheap: the pipeline and the service provider are shared.
///
/// ```rust
/// use weir::{App, Router, middleware};
///
/// async fn index(_req: weir::Request) -> &'static str { "up" }
///
/// let app = App::builder(Router::new().get("/", index))
///     .layer(middleware::trace)
///     .layer(middleware::recover)
///     .build();
/// ```
#[derive(Clone)]
pub struct App {
    chain: Arc<Chain>,
    services: ServiceProvider,
}

impl App {
    pub fn builder(router: Router) -> AppBuilder {
        AppBuilder { router, links: Vec::new(), services: ServiceProvider::default() }
    }

    pub fn services(&self) -> &ServiceProvider {
        &self.services
    }

    /// Runs one request through the pipeline.
    ///
    /// A fresh service scope is opened for the request and dropped with it.
    /// An error that escapes every link is logged and answered with a bare
    /// `500`.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let req = Request::new(req, self.services.create_scope());
        match Next::start(Arc::clone(&self.chain)).run(req).await {
            Ok(res) => res,
            Err(e) => {
                error!(error = %e, "error escaped the middleware chain");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Collects links and services before the pipeline is frozen.
pub struct AppBuilder {
    router: Router,
    links: Vec<crate::middleware::BoxedMiddleware>,
    services: ServiceProvider,
}

impl AppBuilder {
    /// Appends a middleware link. Links run in the order they are added.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.links.push(middleware.into_boxed_middleware());
        self
    }

    pub fn services(mut self, services: ServiceProvider) -> Self {
        self.services = services;
        self
    }

    pub fn build(self) -> App {
        App {
            chain: Arc::new(Chain { links: self.links, router: self.router }),
            services: self.services,
        }
    }
}
