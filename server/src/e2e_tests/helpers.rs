//! Common helpers for end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AppState, BASE_PATH, router};
use crate::restriction::{FixedRestrictionList, RestrictionLookup};
use crate::service::SimulationService;
use crate::storage::SimulationStore;
use crate::testing::{new_test_service, seeded_test_service};

/// Status and decoded body of a response. `body` is `Null` when empty.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `mensagem` field, if present.
    pub fn message(&self) -> Option<&str> {
        self.body["mensagem"].as_str()
    }
}

/// Drives the router in-process on its own runtime.
pub struct TestClient {
    router: Router,
    pub runtime: tokio::runtime::Runtime,
}

impl TestClient {
    /// Client over the default seed simulations and restriction dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(seeded_test_service())
    }

    /// Client over an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_service(new_test_service())
    }

    /// Client over `store`, as the binary would build it.
    #[must_use]
    pub fn with_store(store: Arc<dyn SimulationStore>) -> Self {
        Self::with_service(SimulationService::new(store))
    }

    #[must_use]
    pub fn with_service(service: SimulationService) -> Self {
        Self::with_state(AppState {
            service: Arc::new(service),
            restrictions: Arc::new(FixedRestrictionList::default_dataset()),
            restriction_timeout: Duration::from_secs(2),
        })
    }

    /// Client with a specific restriction source.
    #[must_use]
    pub fn with_restrictions(restrictions: Arc<dyn RestrictionLookup>, timeout: Duration) -> Self {
        Self::with_state(AppState {
            service: Arc::new(seeded_test_service()),
            restrictions,
            restriction_timeout: timeout,
        })
    }

    fn with_state(state: AppState) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create runtime");
        Self {
            router: router(state),
            runtime,
        }
    }

    pub fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None)
    }

    pub fn post(&self, path: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, path, Some(body.to_string()))
    }

    /// POST a body verbatim, valid JSON or not.
    pub fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.send(Method::POST, path, Some(body.to_string()))
    }

    pub fn put(&self, path: &str, body: &Value) -> TestResponse {
        self.send(Method::PUT, path, Some(body.to_string()))
    }

    /// PUT a body verbatim, valid JSON or not.
    pub fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        self.send(Method::PUT, path, Some(body.to_string()))
    }

    pub fn delete(&self, path: &str) -> TestResponse {
        self.send(Method::DELETE, path, None)
    }

    fn send(&self, method: Method, path: &str, body: Option<String>) -> TestResponse {
        let uri = format!("{BASE_PATH}{path}");
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.runtime.block_on(async {
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("Router is infallible");
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("Failed to read body");
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("Response body should be JSON")
            };
            TestResponse { status, body }
        })
    }
}

/// A creation body with only the required fields.
pub fn simulation_body(cpf: &str, name: &str) -> Value {
    serde_json::json!({ "cpf": cpf, "nome": name })
}
