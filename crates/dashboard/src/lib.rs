//! Dockboard server
//!
//! REST facade over the local container engine with a memory usage forecast,
//! health checks and Prometheus metrics.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
