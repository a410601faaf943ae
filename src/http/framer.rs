//! Request framing
//!
//! Turns the connection's receive buffer into complete requests. A frame is
//! the header block, its blank line and exactly `Content-Length` body bytes;
//! anything after that stays in the buffer for the next call, which is how
//! pipelined requests are picked up one by one.

use crate::http::parser::header_values;
use bytes::{Bytes, BytesMut};
use thiserror::Error;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Errors that leave the stream unrecoverable.
///
/// Once the length of a request cannot be trusted there is no way to find
/// where the next one starts, so the connection has to be dropped.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid Content-Length value {0:?}")]
    InvalidContentLength(String),

    #[error("conflicting Content-Length headers")]
    ConflictingContentLength,

    #[error("Content-Length {declared} exceeds limit of {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("request exceeds buffer limit of {limit} bytes")]
    RequestTooLong { limit: usize },
}

/// One complete request as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
    header_len: usize,
}

impl Frame {
    /// Request line and header lines, without the terminating blank line.
    pub fn head(&self) -> &[u8] {
        &self.bytes[..self.header_len - HEADER_TERMINATOR.len()]
    }

    /// The body, exactly `Content-Length` bytes.
    pub fn body(&self) -> Bytes {
        self.bytes.slice(self.header_len..)
    }

    /// The whole frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Splits complete requests off the front of a buffer.
///
/// Remembers how far the current buffer has been searched for the end of
/// the header block, so one framer belongs to one buffer.
#[derive(Debug, Clone, Copy)]
pub struct Framer {
    max_buffer_size: usize,
    max_body_size: usize,
    /// Offset where the next terminator search starts.
    scanned: usize,
}

impl Framer {
    pub fn new(max_buffer_size: usize, max_body_size: usize) -> Self {
        Self {
            max_buffer_size,
            max_body_size,
            scanned: 0,
        }
    }

    /// Pulls the next complete request out of `buf`.
    ///
    /// Returns `Ok(None)` while the header block or the body is still partial;
    /// `buf` is left untouched in that case.
    pub fn next_frame(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        let from = self.scanned.min(buf.len());
        let Some(terminator) = find_terminator(&buf[from..]).map(|pos| from + pos) else {
            // A terminator may straddle the next read
            self.scanned = buf.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
            if buf.len() >= self.max_buffer_size {
                return Err(FrameError::RequestTooLong {
                    limit: self.max_buffer_size,
                });
            }
            return Ok(None);
        };
        self.scanned = terminator;

        let header_len = terminator + HEADER_TERMINATOR.len();
        let content_length = self.content_length(&buf[..terminator])?;

        let total = header_len
            .checked_add(content_length)
            .filter(|total| *total <= self.max_buffer_size)
            .ok_or(FrameError::RequestTooLong {
                limit: self.max_buffer_size,
            })?;

        if buf.len() < total {
            return Ok(None);
        }

        self.scanned = 0;
        Ok(Some(Frame {
            bytes: buf.split_to(total).freeze(),
            header_len,
        }))
    }

    /// Declared body length; a missing header means no body.
    fn content_length(&self, head: &[u8]) -> Result<usize, FrameError> {
        let mut declared = None;

        for value in header_values(head, "Content-Length") {
            let parsed = parse_length(value)?;
            match declared {
                Some(previous) if previous != parsed => {
                    return Err(FrameError::ConflictingContentLength);
                }
                _ => declared = Some(parsed),
            }
        }

        let declared = declared.unwrap_or(0);
        if declared > self.max_body_size {
            return Err(FrameError::BodyTooLarge {
                declared,
                limit: self.max_body_size,
            });
        }
        Ok(declared)
    }
}

fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Only plain decimal digits are accepted: no sign, no blanks, no overflow.
fn parse_length(value: &[u8]) -> Result<usize, FrameError> {
    let invalid = || FrameError::InvalidContentLength(String::from_utf8_lossy(value).into_owned());

    if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    std::str::from_utf8(value)
        .ok()
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_length_rejects_signs_and_garbage() {
        assert_eq!(parse_length(b"42").unwrap(), 42);
        assert!(parse_length(b"-1").is_err());
        assert!(parse_length(b"+1").is_err());
        assert!(parse_length(b"1 2").is_err());
        assert!(parse_length(b"").is_err());
        assert!(parse_length(b"99999999999999999999999999").is_err());
    }

    #[test]
    fn frame_splits_head_and_body() {
        let mut buf = BytesMut::from(&b"PUT /dynamic/a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc"[..]);
        let frame = Framer::new(1024, 512).next_frame(&mut buf).unwrap().unwrap();

        assert_eq!(frame.head(), b"PUT /dynamic/a HTTP/1.1\r\nContent-Length: 3");
        assert_eq!(&frame.body()[..], b"abc");
        assert!(buf.is_empty());
    }
}
