//! End-to-end tests: blocking class in, verified non-blocking class out.

#[path = "e2e/remote_surface.rs"]
mod remote_surface;

#[path = "e2e/shutdown_contract.rs"]
mod shutdown_contract;
