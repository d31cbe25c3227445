use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::StatusCode;
use weir::middleware::{INTERNAL_ERROR_BODY, Next};
use weir::services::{Capability, ServiceCollection};
use weir::{App, Error, HandlerResult, Request, Response, Router, middleware};

type Log = Arc<Mutex<Vec<String>>>;

fn get(uri: &str) -> http::Request<Bytes> {
    http::Request::builder().uri(uri).body(Bytes::new()).unwrap()
}

/// A link that records when it sees the request and the response.
fn recording(name: &'static str, log: Log) -> impl weir::middleware::Middleware {
    move |req: Request, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(format!("{name} before"));
            let res = next.run(req).await;
            log.lock().unwrap().push(format!("{name} after"));
            res
        }
    }
}

#[tokio::test]
async fn links_run_in_declared_order() {
    let log: Log = Arc::default();
    let handler_log = Arc::clone(&log);

    let router = Router::new().get("/", move |_req: Request| {
        let log = Arc::clone(&handler_log);
        async move {
            log.lock().unwrap().push("handler".to_owned());
            "done"
        }
    });
    let app = App::builder(router)
        .layer(recording("first", Arc::clone(&log)))
        .layer(recording("second", Arc::clone(&log)))
        .build();

    let res = app.handle(get("/")).await;
    assert_eq!(res.text_body(), "done");
    assert_eq!(
        *log.lock().unwrap(),
        ["first before", "second before", "handler", "second after", "first after"],
    );
}

#[tokio::test]
async fn a_link_can_short_circuit() {
    async fn deny(_req: Request, _next: Next) -> HandlerResult {
        Ok(Response::status(StatusCode::UNAUTHORIZED))
    }

    let called = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&called);
    let router = Router::new().get("/", move |_req: Request| {
        hits.fetch_add(1, Ordering::SeqCst);
        async { "unreachable" }
    });

    let app = App::builder(router).layer(deny).build();
    let res = app.handle(get("/")).await;

    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn outer_link_sees_inner_response() {
    async fn stamp(req: Request, next: Next) -> HandlerResult {
        let mut res = next.run(req).await?;
        res.headers_mut().insert("x-stamped", "yes".parse().unwrap());
        Ok(res)
    }

    let app = App::builder(Router::new().get("/", |_req: Request| async { "body" }))
        .layer(stamp)
        .build();
    let res = app.handle(get("/")).await;
    assert_eq!(res.headers()["x-stamped"], "yes");
    assert_eq!(res.text_body(), "body");
}

#[tokio::test]
async fn a_link_can_rewrite_the_request() {
    async fn tag_tenant(mut req: Request, next: Next) -> HandlerResult {
        req.headers_mut().insert("x-tenant", "acme".parse().unwrap());
        next.run(req).await
    }

    async fn echo_tenant(req: Request) -> String {
        req.header("x-tenant").unwrap_or("none").to_owned()
    }

    let app = App::builder(Router::new().get("/", echo_tenant))
        .layer(tag_tenant)
        .build();
    assert_eq!(app.handle(get("/")).await.text_body(), "acme");
}

#[tokio::test]
async fn recover_translates_handler_errors() {
    async fn failing(_req: Request) -> Result<String, Error> {
        Err(Error::handler("database unavailable"))
    }

    let app = App::builder(Router::new().get("/", failing))
        .layer(middleware::trace)
        .layer(middleware::recover)
        .build();

    let res = app.handle(get("/")).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text_body(), INTERNAL_ERROR_BODY);
}

#[tokio::test]
async fn recover_catches_panics() {
    async fn exploding(_req: Request) -> &'static str {
        panic!("boom")
    }

    let app = App::builder(Router::new().get("/", exploding))
        .layer(middleware::recover)
        .build();

    let res = app.handle(get("/")).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text_body(), INTERNAL_ERROR_BODY);

    // The app is still usable afterwards.
    let res = app.handle(get("/missing")).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn handlers_behind_recover_stay_in_the_request_span() {
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());

    let seen: Arc<Mutex<Option<&'static str>>> = Arc::default();
    let record = Arc::clone(&seen);
    let router = Router::new().get("/", move |_req: Request| {
        let name = tracing::Span::current().metadata().map(|m| m.name());
        *record.lock().unwrap() = name;
        async { "ok" }
    });

    let app = App::builder(router)
        .layer(middleware::trace)
        .layer(middleware::recover)
        .build();
    assert_eq!(app.handle(get("/")).await.text_body(), "ok");
    assert_eq!(*seen.lock().unwrap(), Some("request"));
}

#[tokio::test]
async fn unrecovered_error_becomes_bare_500() {
    async fn failing(_req: Request) -> Result<String, Error> {
        Err(Error::handler("nobody catches this"))
    }

    let app = App::builder(Router::new().get("/", failing)).build();
    let res = app.handle(get("/")).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn missing_service_is_an_error() {
    struct Unregistered;
    impl Capability for Unregistered {
        type Service = String;
        const NAME: &'static str = "unregistered";
    }

    async fn needs_it(req: Request) -> Result<String, Error> {
        Ok(req.resolve::<Unregistered>()?.as_str().to_owned())
    }

    let app = App::builder(Router::new().get("/", needs_it))
        .layer(middleware::recover)
        .build();
    let res = app.handle(get("/")).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Scoped services ───────────────────────────────────────────────────────────

struct Visit(usize);

struct CurrentVisit;

impl Capability for CurrentVisit {
    type Service = Visit;
    const NAME: &'static str = "current visit";
}

#[tokio::test]
async fn scoped_service_is_shared_within_one_request_only() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let services = ServiceCollection::new()
        .scoped::<CurrentVisit, _>(move |_| Ok(Arc::new(Visit(counter.fetch_add(1, Ordering::SeqCst) + 1))))
        .build();

    async fn tag(req: Request, next: Next) -> HandlerResult {
        let visit = req.resolve::<CurrentVisit>()?;
        let mut res = next.run(req).await?;
        res.headers_mut().insert("x-visit", visit.0.to_string().parse().unwrap());
        Ok(res)
    }

    async fn show(req: Request) -> Result<String, Error> {
        let a = req.resolve::<CurrentVisit>()?;
        let b = req.resolve::<CurrentVisit>()?;
        assert!(Arc::ptr_eq(&a, &b));
        Ok(a.0.to_string())
    }

    let app = App::builder(Router::new().get("/", show))
        .layer(tag)
        .services(services)
        .build();

    let first = app.handle(get("/")).await;
    assert_eq!(first.text_body(), "1");
    assert_eq!(first.headers()["x-visit"], "1");

    let second = app.handle(get("/")).await;
    assert_eq!(second.text_body(), "2");
    assert_eq!(second.headers()["x-visit"], "2");

    assert_eq!(created.load(Ordering::SeqCst), 2);
}
