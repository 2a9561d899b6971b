//! HTTP API handlers for pitch-relay

pub mod cors;
pub mod extract;
pub mod health;

pub use cors::with_cors_headers;
pub use extract::extract_pitch;
pub use health::health_routes;
