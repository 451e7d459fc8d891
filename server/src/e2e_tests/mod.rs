//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router
//! in-process with deterministic inputs.

#![cfg(test)]

mod helpers;

mod test_bad_body;
mod test_create;
mod test_delete;
mod test_get;
mod test_list;
mod test_persistence;
mod test_restrictions;
mod test_update;
