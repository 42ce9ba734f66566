//! Picstash API Library
//!
//! HTTP surface of the photo ingestion pipeline. Exposed as a library so
//! integration tests can assemble the router against test doubles.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod staging;
pub mod state;
