#![forbid(unsafe_code)]

//! The `/users` query gateway.

use std::fmt;
use std::sync::Arc;

use alphadex_core::{NameStore, Prefix, RESULT_CAP, ResultPage, filter};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

/// Query parameters accepted by `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub struct UsersParams {
    #[serde(rename = "startChar")]
    pub start_char: Option<String>,
}

/// Rejections produced by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    /// A required query parameter was absent or empty.
    MissingParameter(&'static str),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(name) => write!(f, "Missing {name} parameter"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingParameter(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
        }
    }
}

/// Validates queries and runs them against the store's current snapshot.
#[derive(Debug, Clone)]
pub struct QueryGateway {
    store: Arc<NameStore>,
}

impl QueryGateway {
    #[must_use]
    pub fn new(store: Arc<NameStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<NameStore> {
        &self.store
    }

    /// Answer one `startChar` query.
    pub fn query(&self, start_char: Option<&str>) -> Result<ResultPage, GatewayError> {
        let prefix = Prefix::parse(start_char.unwrap_or_default())
            .map_err(|_| GatewayError::MissingParameter("startChar"))?;
        let snapshot = self.store.snapshot();
        let page = filter(&snapshot, &prefix, RESULT_CAP);
        tracing::debug!(prefix = %prefix, matches = page.len(), "users query");
        Ok(page)
    }
}

pub(crate) async fn users_handler(
    State(gateway): State<QueryGateway>,
    Query(params): Query<UsersParams>,
) -> Result<Json<ResultPage>, GatewayError> {
    gateway.query(params.start_char.as_deref()).map(Json)
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(lines: &[&str]) -> QueryGateway {
        QueryGateway::new(Arc::new(NameStore::from_lines(lines.iter().copied())))
    }

    fn texts(page: &ResultPage) -> Vec<&str> {
        page.iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_query_uppercases_parameter() {
        let gw = gateway(&["alice", "bob", "alan", "zane"]);
        let page = gw.query(Some("a")).unwrap();
        assert_eq!(texts(&page), vec!["ALICE", "ALAN"]);
    }

    #[test]
    fn test_query_rejects_missing_and_empty() {
        let gw = gateway(&["alice"]);
        assert_eq!(
            gw.query(None),
            Err(GatewayError::MissingParameter("startChar"))
        );
        assert_eq!(
            gw.query(Some("")),
            Err(GatewayError::MissingParameter("startChar"))
        );
    }

    #[test]
    fn test_query_sees_replaced_snapshot() {
        let gw = gateway(&["alice"]);
        gw.store()
            .replace(alphadex_core::normalize_lines("anna\nalbert"));
        let page = gw.query(Some("A")).unwrap();
        assert_eq!(texts(&page), vec!["ANNA", "ALBERT"]);
    }

    #[test]
    fn test_missing_parameter_message() {
        assert_eq!(
            GatewayError::MissingParameter("startChar").to_string(),
            "Missing startChar parameter"
        );
    }
}
