#![forbid(unsafe_code)]

//! alphadex server
//!
//! Exposes prefix filtering over HTTP:
//!
//! - `GET /users?startChar=<prefix>` returns up to [`RESULT_CAP`] names as a
//!   JSON array of strings, in store order.
//! - `GET /healthz` answers `ok`.
//!
//! The router holds a [`QueryGateway`], which owns an `Arc<NameStore>` and no
//! per-request state. Every request reads the current snapshot and runs the
//! pure [`alphadex_core::filter`] against it.

use std::future::Future;
use std::sync::Arc;

use alphadex_core::NameStore;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

pub mod config;
pub mod http;
pub mod logging;

pub use alphadex_core::RESULT_CAP;
pub use config::{ConfigError, LogFormat, ServerConfig};
pub use http::{GatewayError, QueryGateway};
pub use logging::init_tracing;

/// Build the HTTP router around a gateway.
pub fn build_router(gateway: QueryGateway) -> Router {
    Router::new()
        .route("/users", get(http::users_handler))
        .route("/healthz", get(http::healthz_handler))
        .with_state(gateway)
}

/// Serve `store` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: Arc<NameStore>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(QueryGateway::new(store));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
