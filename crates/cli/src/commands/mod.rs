//! CLI command implementations

pub mod engine;
pub mod predict;
