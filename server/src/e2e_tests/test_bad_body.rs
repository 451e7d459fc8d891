//! Test requests whose body is not usable JSON.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_malformed_json() {
    let test = TestClient::new();

    let resp = test.post_raw("/simulacoes", "{ \"nome\": ");

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), Some("Corpo da requisição inválido"));
}

#[test]
fn test_wrong_field_type() {
    let test = TestClient::new();

    let resp = test.post_raw(
        "/simulacoes",
        r#"{ "nome": "Fulano", "cpf": "58253209037", "parcelas": "tres" }"#,
    );

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), Some("Corpo da requisição inválido"));
    assert_eq!(test.get("/simulacoes/58253209037").status, StatusCode::NOT_FOUND);
}

#[test]
fn test_update_of_absent_cpf_reports_not_found_first() {
    let test = TestClient::new();

    let resp = test.put_raw("/simulacoes/58253209037", "{ \"nome\": ");

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), Some("CPF 58253209037 não encontrado"));
}

#[test]
fn test_update_of_present_cpf_with_malformed_json() {
    let test = TestClient::new();

    let resp = test.put_raw("/simulacoes/66414919004", "{ \"nome\": ");

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), Some("Corpo da requisição inválido"));
}
