// Library exports for Glimpse
// This allows integration tests and external code to use Glimpse modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod forms;
pub mod routes;
pub mod state;
