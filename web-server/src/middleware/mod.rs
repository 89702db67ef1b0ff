// web-server/src/middleware/mod.rs
pub mod bearer_auth;
