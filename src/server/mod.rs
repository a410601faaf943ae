//! TCP listener and connection tasks.

pub mod listener;

pub use listener::{run, serve};
