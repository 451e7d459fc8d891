//! Test fetching a single simulation by CPF.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_get_existing() {
    let test = TestClient::new();

    let resp = test.get("/simulacoes/66414919004");

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("Simulação encontrada"));
    let simulation = &resp.body["simulacao"];
    assert_eq!(simulation["cpf"], "66414919004");
    assert_eq!(simulation["nome"], "Fulano");
    assert_eq!(simulation["email"], "fulano@gmail.com");
    assert_eq!(simulation["valor"], 11000.0);
    assert_eq!(simulation["parcelas"], 3);
    assert_eq!(simulation["seguro"], true);
}

#[test]
fn test_get_missing() {
    let test = TestClient::new();

    let resp = test.get("/simulacoes/85471203003");

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), Some("Simulação não encontrada"));
}

#[test]
fn test_get_malformed_cpf() {
    let test = TestClient::new();

    let resp = test.get("/simulacoes/abc");

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
