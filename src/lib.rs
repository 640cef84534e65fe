//! Library exports for the credential monitor, shared between the binary and tests.

pub mod calculator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod routes;
pub mod scan;
pub mod startup;
pub mod state;
pub mod utils;
