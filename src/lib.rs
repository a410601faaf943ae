//! Depot - a minimal HTTP/1.1 origin server
//!
//! Serves a fixed set of static resources under `/static/` and a bounded,
//! mutable set of dynamic resources under `/dynamic/` (GET/PUT/DELETE).

pub mod config;
pub mod http;
pub mod resources;
pub mod router;
pub mod server;
