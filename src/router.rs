//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Patterns are static
//! segments or `{name}` captures. When a static segment and a capture could
//! both match at the same position, the static segment wins regardless of
//! registration order; registering the same pattern twice for one method is
//! rejected.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use http::StatusCode;
use http::header::ALLOW;
use matchit::Router as MatchitRouter;
use tracing::warn;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Handler, HandlerResult};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

#[derive(Clone)]
struct Route {
    pattern: Arc<str>,
    handler: BoxedHandler,
}

/// The application router.
///
/// Build it once at startup and hand it to [`App::builder`](crate::App::builder).
/// Each registration returns `self` so calls chain naturally.
#[derive(Default)]
pub struct Router {
    routes: BTreeMap<Method, MatchitRouter<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use weir::{Method, Request, Response, Router};
    /// # async fn get_product(_: Request) -> Response { Response::text("") }
    /// # async fn list_products(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/products/{id}", get_product)
    ///     .on(Method::Get, "/products",      list_products);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed or conflicts with one already
    /// registered for `method`. Use [`Router::try_on`] to handle that instead.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.try_on(method, path, handler)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Like [`Router::on`], but reports an invalid or conflicting pattern.
    pub fn try_on(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        let route = Route { pattern: Arc::from(path), handler: handler.into_boxed_handler() };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .map_err(|source| Error::Route { path: path.to_owned(), source })?;
        Ok(self)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Finds the route registered for `method` whose pattern matches `path`.
    ///
    /// Captured values are percent-decoded. A capture that does not decode
    /// to UTF-8 is kept raw and recorded in [`RouteMatch::malformed`].
    pub fn lookup(&self, method: Method, path: &str) -> Option<RouteMatch> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;

        let mut params = HashMap::with_capacity(matched.params.len());
        let mut malformed = None;
        for (name, raw) in matched.params.iter() {
            let value = match urlencoding::decode(raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => {
                    malformed.get_or_insert_with(|| (name.to_owned(), raw.to_owned()));
                    raw.to_owned()
                }
            };
            params.insert(name.to_owned(), value);
        }
        Some(RouteMatch { route: matched.value.clone(), params, malformed })
    }

    /// Methods with a route matching `path`, in a stable order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect()
    }

    /// Routes one request: the matched handler's result, `404` when nothing
    /// matches, or `405` with an `allow` header when only other methods match.
    pub async fn dispatch(&self, req: Request) -> HandlerResult {
        let Ok(method) = Method::try_from(req.method()) else {
            return Ok(Response::status(StatusCode::METHOD_NOT_ALLOWED));
        };

        if let Some(matched) = self.lookup(method, req.path()) {
            if let Some((name, value)) = matched.malformed() {
                warn!(param = name, value, "path parameter is not valid UTF-8");
                return Ok(Response::status(StatusCode::BAD_REQUEST));
            }
            return matched.dispatch(req).await;
        }

        let allowed = self.allowed_methods(req.path());
        if allowed.is_empty() {
            return Ok(Response::status(StatusCode::NOT_FOUND));
        }
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(ALLOW.as_str(), &allow)
            .no_body())
    }
}

/// A successful route lookup: the handler plus the parameters it captured.
pub struct RouteMatch {
    route: Route,
    params: HashMap<String, String>,
    malformed: Option<(String, String)>,
}

impl RouteMatch {
    /// The registered pattern, e.g. `/products/{id}`.
    pub fn pattern(&self) -> &str {
        &self.route.pattern
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// The first capture that failed to decode, as `(name, raw value)`.
    pub fn malformed(&self) -> Option<(&str, &str)> {
        self.malformed.as_ref().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Invokes the bound handler with the captured parameters.
    ///
    /// Fails with [`Error::InvalidParam`] if a capture was not valid UTF-8.
    pub fn dispatch(self, mut req: Request) -> BoxFuture<HandlerResult> {
        if let Some((name, value)) = self.malformed {
            return Box::pin(async move { Err(Error::InvalidParam { name, value }) });
        }
        req.set_params(self.params);
        self.route.handler.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_req: Request) -> &'static str {
        "ok"
    }

    #[test]
    fn captures_named_parameter() {
        let router = Router::new().get("/products/{id}", noop);
        let matched = router.lookup(Method::Get, "/products/2").unwrap();
        assert_eq!(matched.pattern(), "/products/{id}");
        assert_eq!(matched.params()["id"], "2");
        assert!(router.lookup(Method::Post, "/products/2").is_none());
        assert!(router.lookup(Method::Get, "/products/2/reviews").is_none());
    }

    #[test]
    fn captures_are_percent_decoded() {
        let router = Router::new().get("/greet/{name}", noop);
        let matched = router.lookup(Method::Get, "/greet/Ada%20Lovelace").unwrap();
        assert_eq!(matched.params()["name"], "Ada Lovelace");
        assert!(matched.malformed().is_none());
    }

    #[test]
    fn undecodable_capture_is_flagged() {
        let router = Router::new().get("/greet/{name}", noop);
        let matched = router.lookup(Method::Get, "/greet/%FF").unwrap();
        assert_eq!(matched.malformed(), Some(("name", "%FF")));
        assert_eq!(matched.params()["name"], "%FF");
    }

    #[test]
    fn static_segment_beats_parameter() {
        let router = Router::new()
            .get("/products/{id}", noop)
            .get("/products/featured", noop);
        let matched = router.lookup(Method::Get, "/products/featured").unwrap();
        assert_eq!(matched.pattern(), "/products/featured");
        let matched = router.lookup(Method::Get, "/products/7").unwrap();
        assert_eq!(matched.pattern(), "/products/{id}");
    }

    #[test]
    fn duplicate_pattern_is_rejected() {
        let result = Router::new()
            .get("/products/{id}", noop)
            .try_on(Method::Get, "/products/{id}", noop);
        assert!(matches!(result, Err(Error::Route { .. })));
    }

    #[test]
    fn allowed_methods_are_sorted() {
        let router = Router::new()
            .post("/products", noop)
            .get("/products", noop);
        assert_eq!(router.allowed_methods("/products"), vec![Method::Get, Method::Post]);
        assert!(router.allowed_methods("/nope").is_empty());
    }
}
