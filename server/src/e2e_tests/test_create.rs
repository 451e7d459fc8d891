//! Test creating simulations.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[test]
fn test_create_then_get() {
    let test = TestClient::new();

    let body = json!({
        "nome": "Beltrano",
        "cpf": "58253209037",
        "email": "beltrano@gmail.com",
        "valor": 1200,
        "parcelas": 3,
        "seguro": true
    });
    let resp = test.post("/simulacoes", &body);

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.message(), Some("Simulação criada com sucesso"));
    assert_eq!(resp.body["simulacao"]["cpf"], "58253209037");
    assert_eq!(resp.body["simulacao"]["id"], 3);

    let found = test.get("/simulacoes/58253209037");
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["simulacao"]["nome"], "Beltrano");
    assert_eq!(found.body["simulacao"]["parcelas"], 3);
}

#[test]
fn test_create_with_empty_name() {
    let test = TestClient::new();

    let resp = test.post("/simulacoes", &simulation_body("58253209037", ""));

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["erros"]["nome"], "Nome não pode ser vazio");
    assert_eq!(test.get("/simulacoes/58253209037").status, StatusCode::NOT_FOUND);
}

#[test]
fn test_create_reports_every_field() {
    let test = TestClient::new();

    let resp = test.post("/simulacoes", &json!({ "email": "x@gmail.com" }));

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.body["erros"],
        json!({ "cpf": "CPF não pode ser vazio", "nome": "Nome não pode ser vazio" })
    );
}

#[test]
fn test_create_with_invalid_cpf() {
    let test = TestClient::new();

    let resp = test.post("/simulacoes", &simulation_body("12345678900", "Fulano"));

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["erros"]["cpf"], "CPF inválido");
}

#[test]
fn test_create_duplicate_cpf() {
    let test = TestClient::new();

    let resp = test.post("/simulacoes", &simulation_body("66414919004", "Outro Fulano"));

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.message(), Some("CPF já existente"));

    let found = test.get("/simulacoes/66414919004");
    assert_eq!(found.body["simulacao"]["nome"], "Fulano");
}

#[test]
fn test_create_restricted_cpf_is_allowed() {
    let test = TestClient::new();

    let resp = test.post("/simulacoes", &simulation_body("97093236014", "Restrito"));

    assert_eq!(resp.status, StatusCode::CREATED);
}
