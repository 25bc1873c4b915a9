//! Integration test utilities for the gateway client
//!
//! This crate provides a fake REST API and a fake websocket gateway so the
//! client can be driven end to end on localhost.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
