//! Test listing simulations.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_list_seeded() {
    let test = TestClient::new();

    let resp = test.get("/simulacoes");

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("Simulações encontradas"));
    let simulations = resp.body["simulacoes"].as_array().unwrap();
    assert_eq!(simulations.len(), 2);
    assert_eq!(simulations[0]["cpf"], "66414919004");
    assert_eq!(simulations[0]["nome"], "Fulano");
    assert_eq!(simulations[1]["cpf"], "17822386034");
}

#[test]
fn test_list_empty() {
    let test = TestClient::empty();

    let resp = test.get("/simulacoes");

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["simulacoes"], serde_json::json!([]));
}
