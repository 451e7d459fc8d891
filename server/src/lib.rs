#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// Life of a request:
// 1. JSON comes in on an axum route
// 2. Handler hands the decoded request to the simulation service
// 3. Service validates and applies the business rules:
//     - Create / update / delete go through the store's write lock
//     - The log store appends and syncs a record before the index changes
// 4. Service outcome is mapped to exactly one status code and message
//
// Restriction lookups take a separate path: route -> lookup (bounded by a
// timeout) -> 200 / 204 / 503. They never touch the service.

pub mod api;
pub mod config;
pub mod constants;
pub mod cpf;
pub mod restriction;
pub mod service;
pub mod storage;
pub mod types;

#[cfg(test)]
mod e2e_tests;

pub use api::{AppState, router};
pub use service::{ServiceError, SimulationService};
