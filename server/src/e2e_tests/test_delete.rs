//! Test removing simulations.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_delete_then_get() {
    let test = TestClient::new();

    let resp = test.delete("/simulacoes/66414919004");
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("Simulação removida com sucesso"));

    let found = test.get("/simulacoes/66414919004");
    assert_eq!(found.status, StatusCode::NOT_FOUND);

    let again = test.delete("/simulacoes/66414919004");
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.message(), Some("Simulação não encontrada"));
}

#[test]
fn test_deleted_cpf_can_be_created_again() {
    let test = TestClient::new();

    assert_eq!(test.delete("/simulacoes/17822386034").status, StatusCode::OK);
    let resp = test.post("/simulacoes", &simulation_body("17822386034", "Deltrano"));

    assert_eq!(resp.status, StatusCode::CREATED);
    // Ids are never reused.
    assert_eq!(resp.body["simulacao"]["id"], 3);
}
