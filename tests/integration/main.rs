//! Integration tests for Catalog-Sweep
//!
//! These tests use wiremock to stand in for the store websites and tempfile
//! for catalog databases and configuration files.

mod adapter_tests;
mod common;
mod config_tests;
mod http_tests;
mod session_tests;
