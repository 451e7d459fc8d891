//! Test updating simulations.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[test]
fn test_update_name() {
    let test = TestClient::new();

    let resp = test.put(
        "/simulacoes/66414919004",
        &simulation_body("66414919004", "Fulano Atualizado"),
    );

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["nome"], "Fulano Atualizado");
    assert_eq!(resp.body["cpf"], "66414919004");
    // Fields absent from the body keep their values.
    assert_eq!(resp.body["email"], "fulano@gmail.com");
    assert_eq!(resp.body["parcelas"], 3);

    let found = test.get("/simulacoes/66414919004");
    assert_eq!(found.body["simulacao"]["nome"], "Fulano Atualizado");
}

#[test]
fn test_update_without_cpf_in_body() {
    let test = TestClient::new();

    let resp = test.put("/simulacoes/17822386034", &json!({ "parcelas": 12 }));

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["parcelas"], 12);
    assert_eq!(resp.body["nome"], "Deltrano");
}

#[test]
fn test_update_missing() {
    let test = TestClient::new();

    let resp = test.put(
        "/simulacoes/58253209037",
        &simulation_body("58253209037", "Fulano"),
    );

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), Some("CPF 58253209037 não encontrado"));
}

#[test]
fn test_update_onto_existing_cpf() {
    let test = TestClient::new();

    let resp = test.put(
        "/simulacoes/66414919004",
        &simulation_body("17822386034", "Fulano"),
    );

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.message(), Some("CPF 17822386034 já existe"));
}

#[test]
fn test_update_with_empty_name() {
    let test = TestClient::new();

    let resp = test.put("/simulacoes/66414919004", &json!({ "nome": "" }));

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["erros"]["nome"], "Nome não pode ser vazio");
}
