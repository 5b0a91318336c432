//! HTTP surface - trigger, download, and status routes

pub mod routes;

pub use routes::{router, ApiState};
