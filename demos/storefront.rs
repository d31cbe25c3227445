//! The storefront service: index, greeting, product catalog and health probes.
//!
//! Run with:
//!   cargo run --example storefront
//!
//! Configure through `weir.toml` or the environment:
//!   WEIR__BIND=127.0.0.1:8080 WEIR__LOG=weir=debug cargo run --example storefront
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl http://localhost:3000/greet/Ada
//!   curl http://localhost:3000/products
//!   curl http://localhost:3000/products/2
//!   curl -i http://localhost:3000/products/999
//!   curl http://localhost:3000/healthz

use tracing_subscriber::EnvFilter;
use weir::config::ServerConfig;
use weir::storefront::{self, ProductCatalog};
use weir::{Error, Server};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // The filter comes from the config, so loading it logs through a
    // temporary subscriber at the default level.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(ServerConfig::default().log))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || ServerConfig::load(None))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log))
        .init();

    Server::bind(config.bind)
        .serve(storefront::app(ProductCatalog::seeded()))
        .await
}
