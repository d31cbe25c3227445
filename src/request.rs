//! Incoming HTTP request type.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Uri};

use crate::error::Error;
use crate::services::{Capability, Scope};

/// An incoming HTTP request with its body fully buffered.
///
/// Each request carries its own service [`Scope`]; scoped services resolved
/// through [`Request::resolve`] are shared for the rest of this request only.
pub struct Request {
    pub(crate) method: http::Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) scope: Scope,
}

impl Request {
    pub(crate) fn new(req: http::Request<Bytes>, scope: Scope) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
            scope,
        }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup; names are case-insensitive. Non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/products/{id}`, `req.param("id")` on `/products/2` returns `Some("2")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a named path parameter.
    ///
    /// # Errors
    ///
    /// [`Error::MissingParam`] if the route captured no such parameter,
    /// [`Error::InvalidParam`] if the value does not parse as `T`.
    pub fn param_as<T: FromStr>(&self, key: &str) -> Result<T, Error> {
        let value = self.param(key).ok_or_else(|| Error::MissingParam(key.to_owned()))?;
        value.parse().map_err(|_| Error::InvalidParam {
            name: key.to_owned(),
            value: value.to_owned(),
        })
    }

    /// Resolves a service from this request's scope.
    pub fn resolve<C: Capability>(&self) -> Result<Arc<C::Service>, Error> {
        self.scope.resolve::<C>()
    }

    /// The request's service scope.
    pub fn services(&self) -> &Scope {
        &self.scope
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceProvider;

    fn request(uri: &str) -> Request {
        let req = http::Request::builder()
            .uri(uri)
            .header("X-Request-Id", "abc")
            .body(Bytes::new())
            .unwrap();
        Request::new(req, ServiceProvider::default().create_scope())
    }

    #[test]
    fn splits_path_and_query() {
        let req = request("/products?sort=price");
        assert_eq!(req.path(), "/products");
        assert_eq!(req.query(), Some("sort=price"));
        assert_eq!(req.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn typed_params() {
        let mut req = request("/products/2");
        req.set_params(HashMap::from([("id".to_owned(), "2".to_owned())]));
        assert_eq!(req.param_as::<u32>("id").unwrap(), 2);
        assert!(matches!(req.param_as::<u32>("name"), Err(Error::MissingParam(_))));

        req.set_params(HashMap::from([("id".to_owned(), "two".to_owned())]));
        assert!(matches!(req.param_as::<u32>("id"), Err(Error::InvalidParam { .. })));
    }
}
