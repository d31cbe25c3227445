//! A small storefront service assembled from the framework's parts.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | `200` fixed text |
//! | `GET /greet/{name}` | `200` greeting from the transient [`Greeting`] service |
//! | `GET /products` | `200` JSON array from the scoped [`Products`] repository |
//! | `GET /products/{id}` | `200` JSON object, or `404` `Product not found` for any unknown 32-bit id |
//! | `GET /healthz`, `GET /readyz` | health probes |
//!
//! The pipeline is `trace` → `recover` → router, so a handler error (a
//! non-numeric or out-of-range product id, say) is logged and answered
//! with `500`.
//!
//! The catalog is an owned, read-only value handed to [`app`]; the
//! [`Catalog`] singleton holds it and every request's repository borrows it.

use std::sync::Arc;

use http::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::services::{Capability, ServiceCollection, ServiceProvider};
use crate::{App, Error, IntoResponse, Json, Request, Response, Router, health, middleware};

pub const INDEX_BODY: &str = "ASP.NET Core is running!";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

// ── Data ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(id: u32, name: &str, price: Decimal) -> Self {
        Self { id, name: name.to_owned(), price }
    }
}

/// Read-only product list. Cloning shares the underlying slice.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Arc<[Product]>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products: products.into() }
    }

    /// Laptop, Mouse and Keyboard.
    pub fn seeded() -> Self {
        Self::new(vec![
            Product::new(1, "Laptop", Decimal::new(99_999, 2)),
            Product::new(2, "Mouse", Decimal::new(2_999, 2)),
            Product::new(3, "Keyboard", Decimal::new(7_999, 2)),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

// ── Services ──────────────────────────────────────────────────────────────────

pub trait GreetingService: Send + Sync {
    fn greeting(&self, name: &str) -> String;
}

pub struct WelcomeGreeter;

impl GreetingService for WelcomeGreeter {
    fn greeting(&self, name: &str) -> String {
        format!("Hello, {name}! Welcome to ASP.NET Core.")
    }
}

pub trait ProductRepository: Send + Sync {
    fn all(&self) -> &[Product];
    fn by_id(&self, id: u32) -> Option<&Product>;
}

pub struct CatalogRepository {
    catalog: Arc<ProductCatalog>,
}

impl CatalogRepository {
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self { catalog }
    }
}

impl ProductRepository for CatalogRepository {
    fn all(&self) -> &[Product] {
        self.catalog.products()
    }

    fn by_id(&self, id: u32) -> Option<&Product> {
        self.catalog.products().iter().find(|p| p.id == id)
    }
}

/// Greeting service, a fresh instance per resolution.
pub struct Greeting;

impl Capability for Greeting {
    type Service = dyn GreetingService;
    const NAME: &'static str = "greeting";
}

/// Product repository, one per request.
pub struct Products;

impl Capability for Products {
    type Service = dyn ProductRepository;
    const NAME: &'static str = "products";
}

/// The product catalog, one for the whole app.
pub struct Catalog;

impl Capability for Catalog {
    type Service = ProductCatalog;
    const NAME: &'static str = "catalog";
}

pub fn services(catalog: ProductCatalog) -> ServiceProvider {
    ServiceCollection::new()
        .transient::<Greeting, _>(|_| Ok(Arc::new(WelcomeGreeter)))
        .scoped::<Products, _>(|scope| {
            let catalog = scope.resolve::<Catalog>()?;
            Ok(Arc::new(CatalogRepository::new(catalog)))
        })
        .singleton::<Catalog, _>(move |_| Ok(Arc::new(catalog.clone())))
        .build()
}

// ── Routes ────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .get("/",               index)
        .get("/greet/{name}",   greet)
        .get("/products",       list_products)
        .get("/products/{id}",  get_product)
        .get("/healthz",        health::liveness)
        .get("/readyz",         health::readiness)
}

pub fn app(catalog: ProductCatalog) -> App {
    App::builder(router())
        .layer(middleware::trace)
        .layer(middleware::recover)
        .services(services(catalog))
        .build()
}

// GET /
async fn index(_req: Request) -> &'static str {
    INDEX_BODY
}

// GET /greet/{name}
async fn greet(req: Request) -> Result<String, Error> {
    let greeter = req.resolve::<Greeting>()?;
    let name = req.param("name").ok_or_else(|| Error::MissingParam("name".to_owned()))?;
    Ok(greeter.greeting(name))
}

// GET /products
async fn list_products(req: Request) -> Result<Json<Vec<Product>>, Error> {
    let repository = req.resolve::<Products>()?;
    Ok(Json(repository.all().to_vec()))
}

// GET /products/{id}
async fn get_product(req: Request) -> Result<Response, Error> {
    let repository = req.resolve::<Products>()?;
    // Any 32-bit signed id is a lookup; only text or overflow is an error.
    let id: i32 = req.param_as("id")?;

    Ok(match u32::try_from(id).ok().and_then(|id| repository.by_id(id)) {
        Some(product) => Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND).into_response(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_finds_by_id() {
        let repository = CatalogRepository::new(Arc::new(ProductCatalog::seeded()));
        assert_eq!(repository.all().len(), 3);
        assert_eq!(repository.by_id(2).map(|p| p.name.as_str()), Some("Mouse"));
        assert!(repository.by_id(999).is_none());
    }

    #[test]
    fn scoped_repository_shares_singleton_catalog() {
        let provider = services(ProductCatalog::seeded());
        let a = provider.create_scope().resolve::<Catalog>().unwrap();
        let b = provider.create_scope().resolve::<Catalog>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(provider.len(), 3);
    }

    #[test]
    fn greeting_template() {
        assert_eq!(WelcomeGreeter.greeting("Ada"), "Hello, Ada! Welcome to ASP.NET Core.");
    }
}
