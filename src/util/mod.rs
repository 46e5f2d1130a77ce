//! Utility modules: configuration, logging, diagnostics

pub mod config;
pub mod diagnostic;
pub mod logger;
