//! Configuration and the data passed between pipeline stages

pub mod config;
pub mod models;
