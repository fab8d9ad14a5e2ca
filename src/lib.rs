//! cloudcate - search a cloud resource inventory from the terminal
//!
//! The binary drives a ratatui front end over these modules; the library
//! exposes them so the round trip can be exercised against a mock backend.

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod location;
pub mod query;
pub mod resource;
pub mod search;
pub mod ui;

/// Version injected at compile time via CLOUDCATE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CLOUDCATE_VERSION") {
    Some(v) => v,
    None => "dev",
};
