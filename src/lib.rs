// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod engine;
pub mod export;
pub mod model;
pub mod providers;
pub mod teams;
