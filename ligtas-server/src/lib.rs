//! ligtas-server: HTTP API for the farm registry
//!
//! Records farms, predicts soil acidity for farms at surveyed locations,
//! and exposes the baseline table and model feature importance.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options, DbError, Farm, FarmRepo};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
