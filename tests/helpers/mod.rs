//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod project_helpers;
pub mod symbol_fixtures;
