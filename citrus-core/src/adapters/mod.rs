//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - HTTP client for the LedgerGateway port (the Citrus REST service)
//! - In-memory demo gateway for demo mode and tests
//! - JSON file storage for the persistent guest store

pub mod demo;
pub mod guest_vault;
pub mod http;
