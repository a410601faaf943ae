use crate::http::framer::Frame;
use crate::http::request::{Method, Request};
use thiserror::Error;

/// Longest accepted method token.
pub const MAX_METHOD_LEN: usize = 15;
/// Longest accepted request target.
pub const MAX_PATH_LEN: usize = 255;
/// Longest accepted version token.
pub const MAX_VERSION_LEN: usize = 15;

/// Reasons a framed request is rejected with 400.
///
/// None of these desynchronise the stream: the frame boundaries are already
/// known, so the connection can go on with the next request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line must have exactly three tokens")]
    MalformedRequestLine,

    #[error("{token} token is {len} bytes, limit is {max}")]
    TokenTooLong {
        token: &'static str,
        len: usize,
        max: usize,
    },

    #[error("header block is not valid UTF-8")]
    InvalidEncoding,

    #[error("malformed header line")]
    InvalidHeader,

    #[error("header block has {count} lines, limit is {max}")]
    TooManyHeaders { count: usize, max: usize },

    #[error("header line is {len} bytes, limit is {max}")]
    HeaderLineTooLong { len: usize, max: usize },
}

/// Hardening limits checked against the framed header block before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLimits {
    /// Lines in the header block, request line included.
    pub max_lines: usize,
    /// Bytes per line, CRLF excluded.
    pub max_line_length: usize,
}

impl HeaderLimits {
    /// No limits at all.
    pub fn unbounded() -> Self {
        Self {
            max_lines: usize::MAX,
            max_line_length: usize::MAX,
        }
    }
}

impl Default for HeaderLimits {
    fn default() -> Self {
        Self {
            max_lines: 100,
            max_line_length: 1024,
        }
    }
}

/// Parses one framed request into a [`Request`].
///
/// The body is a zero-copy slice of the frame.
pub fn parse_request(frame: &Frame, limits: &HeaderLimits) -> Result<Request, ParseError> {
    let head = std::str::from_utf8(frame.head()).map_err(|_| ParseError::InvalidEncoding)?;

    check_limits(head, limits)?;

    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::MalformedRequestLine)?;
    if has_bare_line_break(request_line) {
        return Err(ParseError::MalformedRequestLine);
    }
    let mut parts = request_line.split_ascii_whitespace();

    let (Some(method), Some(path), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedRequestLine);
    };

    check_token("method", method, MAX_METHOD_LEN)?;
    check_token("path", path, MAX_PATH_LEN)?;
    check_token("version", version, MAX_VERSION_LEN)?;

    // Headers
    let mut headers = Vec::new();

    for line in lines {
        if has_bare_line_break(line) {
            return Err(ParseError::InvalidHeader);
        }
        let (name, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::InvalidHeader);
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: frame.body(),
    })
}

/// Case-insensitive header lookup over a raw header block.
///
/// Skips the request line, tolerates whitespace around the colon and returns
/// the trimmed value of the first matching header. Lines without a colon are
/// ignored here; [`parse_request`] rejects them later.
pub fn find_header<'a>(head: &'a [u8], name: &str) -> Option<&'a [u8]> {
    header_values(head, name).next()
}

/// Every value for `name` in a raw header block, in order.
///
/// Lines are split on CRLF only, exactly as [`parse_request`] splits them.
pub fn header_values<'a, 'n>(head: &'a [u8], name: &'n str) -> impl Iterator<Item = &'a [u8]> {
    crlf_lines(head)
        .skip(1)
        .filter_map(move |line| {
            let colon = line.iter().position(|&b| b == b':')?;
            let (key, value) = (&line[..colon], &line[colon + 1..]);
            key.trim_ascii()
                .eq_ignore_ascii_case(name.as_bytes())
                .then_some(value.trim_ascii())
        })
}

fn crlf_lines(head: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(head);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.windows(2).position(|w| w == b"\r\n") {
            Some(end) => {
                rest = Some(&current[end + 2..]);
                Some(&current[..end])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// A lone CR or LF inside a CRLF-delimited line.
fn has_bare_line_break(line: &str) -> bool {
    line.contains(['\r', '\n'])
}

fn check_token(token: &'static str, value: &str, max: usize) -> Result<(), ParseError> {
    if value.len() > max {
        return Err(ParseError::TokenTooLong {
            token,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

fn check_limits(head: &str, limits: &HeaderLimits) -> Result<(), ParseError> {
    let mut count = 0;
    for line in head.split("\r\n") {
        count += 1;
        if count > limits.max_lines {
            return Err(ParseError::TooManyHeaders {
                count: head.split("\r\n").count(),
                max: limits.max_lines,
            });
        }
        if line.len() > limits.max_line_length {
            return Err(ParseError::HeaderLineTooLong {
                len: line.len(),
                max: limits.max_line_length,
            });
        }
    }
    Ok(())
}
