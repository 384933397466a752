pub mod auth;
pub mod event_bus;
pub mod lifecycle;
pub mod orchestrator;
pub mod ports;
pub mod reducer;
pub mod repository;
pub mod streaming;
