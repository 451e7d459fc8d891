//! Test that simulations written through the API survive a restart.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::service::{SimulationService, default_seed};
use crate::storage::{LogStore, open_store};

#[test]
fn test_log_store_survives_restart() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("simulacoes.log");

    {
        let (store, _) = LogStore::open(&path).expect("create store");
        let test = TestClient::with_store(Arc::new(store));
        let created = test.post("/simulacoes", &simulation_body("58253209037", "Beltrano"));
        assert_eq!(created.status, StatusCode::CREATED);
        let updated = test.put("/simulacoes/58253209037", &json!({ "valor": 5000 }));
        assert_eq!(updated.status, StatusCode::OK);
        let created = test.post("/simulacoes", &simulation_body("97093236014", "Ciclano"));
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(test.delete("/simulacoes/97093236014").status, StatusCode::OK);
    }

    let (store, replay) = LogStore::open(&path).expect("reopen store");
    assert_eq!(replay.records_replayed, 4);
    let test = TestClient::with_store(Arc::new(store));

    let list = test.get("/simulacoes");
    let simulations = list.body["simulacoes"].as_array().unwrap();
    assert_eq!(simulations.len(), 1);
    assert_eq!(simulations[0]["nome"], "Beltrano");
    assert_eq!(simulations[0]["valor"], 5000.0);
    assert_eq!(test.get("/simulacoes/97093236014").status, StatusCode::NOT_FOUND);
}

/// Open the log and seed it the way the server does on startup.
fn start(path: &std::path::Path) -> TestClient {
    let opened = open_store(Some(path)).expect("open store");
    let service = SimulationService::new(opened.store);
    if opened.is_new {
        service.seed(default_seed()).expect("seed store");
    }
    TestClient::with_service(service)
}

#[test]
fn test_deleted_seed_stays_deleted_after_restart() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("simulacoes.log");

    {
        let test = start(&path);
        assert_eq!(test.get("/simulacoes/66414919004").status, StatusCode::OK);
        assert_eq!(test.delete("/simulacoes/66414919004").status, StatusCode::OK);
    }

    let test = start(&path);
    assert_eq!(test.get("/simulacoes/66414919004").status, StatusCode::NOT_FOUND);
    assert_eq!(test.get("/simulacoes/17822386034").status, StatusCode::OK);
}
