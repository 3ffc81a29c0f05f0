//! Integration tests for Check-Ratings
//!
//! These tests use wiremock to serve store pages and tempfile for the
//! input lists, snapshots and reports.

mod gather_tests;
mod report_tests;
