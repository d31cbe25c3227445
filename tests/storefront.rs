use bytes::Bytes;
use http::StatusCode;
use serde_json::{Value, json};
use weir::middleware::INTERNAL_ERROR_BODY;
use weir::storefront::{self, INDEX_BODY, PRODUCT_NOT_FOUND, ProductCatalog};
use weir::{App, Response};

fn app() -> App {
    storefront::app(ProductCatalog::seeded())
}

async fn send(app: &App, method: &str, uri: &str) -> Response {
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap();
    app.handle(req).await
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

#[tokio::test]
async fn index_reports_running() {
    let res = send(&app(), "GET", "/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text_body(), INDEX_BODY);
    assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
}

#[tokio::test]
async fn greets_by_name() {
    let res = send(&app(), "GET", "/greet/Ada").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text_body(), "Hello, Ada! Welcome to ASP.NET Core.");
}

#[tokio::test]
async fn lists_every_product() {
    let res = send(&app(), "GET", "/products").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");

    let body = json_body(&res);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Laptop", "Mouse", "Keyboard"]);
}

#[tokio::test]
async fn fetches_one_product() {
    let res = send(&app(), "GET", "/products/2").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(json_body(&res), json!({ "id": 2, "name": "Mouse", "price": 29.99 }));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let res = send(&app(), "GET", "/products/999").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.text_body(), PRODUCT_NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_an_internal_error() {
    let res = send(&app(), "GET", "/products/abc").await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text_body(), INTERNAL_ERROR_BODY);
}

#[tokio::test]
async fn any_signed_id_without_a_product_is_not_found() {
    let app = app();
    for uri in ["/products/-1", "/products/0", "/products/2147483647"] {
        let res = send(&app, "GET", uri).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(res.text_body(), PRODUCT_NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn id_beyond_signed_range_is_an_internal_error() {
    let res = send(&app(), "GET", "/products/2147483648").await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text_body(), INTERNAL_ERROR_BODY);
}

#[tokio::test]
async fn greeting_name_is_percent_decoded() {
    let res = send(&app(), "GET", "/greet/Ada%20Lovelace").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text_body(), "Hello, Ada Lovelace! Welcome to ASP.NET Core.");
}

#[tokio::test]
async fn undecodable_name_is_a_bad_request() {
    let res = send(&app(), "GET", "/greet/%FF").await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_method_lists_allowed() {
    let res = send(&app(), "POST", "/products").await;
    assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "GET");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let res = send(&app(), "GET", "/nope").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn health_probes() {
    let app = app();
    assert_eq!(send(&app, "GET", "/healthz").await.text_body(), "ok");
    assert_eq!(send(&app, "GET", "/readyz").await.text_body(), "ready");
}

#[tokio::test]
async fn custom_catalog_is_served() {
    use rust_decimal::Decimal;
    use weir::storefront::Product;

    let app = storefront::app(ProductCatalog::new(vec![Product::new(7, "Cable", Decimal::new(500, 2))]));
    let res = send(&app, "GET", "/products/7").await;
    assert_eq!(json_body(&res), json!({ "id": 7, "name": "Cable", "price": 5.0 }));
    assert_eq!(send(&app, "GET", "/products/1").await.status_code(), StatusCode::NOT_FOUND);
}
