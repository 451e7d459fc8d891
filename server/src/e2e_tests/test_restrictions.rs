//! Test the restriction lookup route.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;
use crate::restriction::{RestrictionError, RestrictionLookup};

struct StalledLookup;

impl RestrictionLookup for StalledLookup {
    fn has_restriction(&self, _cpf: &str) -> Result<bool, RestrictionError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(false)
    }
}

#[test]
fn test_restricted_cpf() {
    let test = TestClient::new();

    let resp = test.get("/restricoes/97093236014");

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("O CPF 97093236014 tem restrição"));
}

#[test]
fn test_unrestricted_cpf() {
    let test = TestClient::new();

    let resp = test.get("/restricoes/85471203003");

    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.body.is_null());
}

#[test]
fn test_lookup_timeout() {
    let test = TestClient::with_restrictions(Arc::new(StalledLookup), Duration::from_millis(20));

    let resp = test.get("/restricoes/97093236014");

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.message(), Some("Serviço de restrições indisponível"));
}
