//! HTTP/1.1 protocol handling.
//!
//! # Architecture
//!
//! - **`framer`**: splits complete requests (header block plus `Content-Length` body) off the receive buffer
//! - **`parser`**: request line and header parsing, header lookup and header limits
//! - **`request`**: HTTP request representation
//! - **`response`**: status codes and the response type
//! - **`writer`**: serializes a response and writes every byte of it
//! - **`connection`**: the per-connection request/response state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Frame the next request, reading only when the buffer has none
//!        └──────┬──────┘
//!               │ Request framed and parsed (or rejected with 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to the static table or the dynamic store
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send every byte of the response
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ keep-alive → Reading (next pipelined request)
//!               └─ close → Closed
//! ```
//!
//! Requests on one connection are always answered in the order they arrived.

pub mod connection;
pub mod framer;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
