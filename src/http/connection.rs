use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::http::framer::{FrameError, Framer};
use crate::http::parser::{HeaderLimits, parse_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// Bytes reserved ahead of each socket read.
const READ_CHUNK: usize = 4096;

/// Per-connection limits.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    /// Template copied into each connection, which then owns its scan state.
    pub framer: Framer,
    pub header_limits: HeaderLimits,
    /// Longest wait for more bytes before the connection is dropped.
    pub read_timeout: Duration,
}

impl ConnectionConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            framer: Framer::new(cfg.limits.max_buffer_size, cfg.limits.max_body_size),
            header_limits: HeaderLimits {
                max_lines: cfg.limits.max_header_lines,
                max_line_length: cfg.limits.max_header_line_length,
            },
            read_timeout: cfg.read_timeout(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    framer: Framer,
    state: ConnectionState,
    router: Router,
    config: ConnectionConfig,
    cancel: CancellationToken,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = close after write
    Closed,
}

/// Outcome of waiting for the next request.
enum Incoming {
    Request(Request),
    /// The request could not be used; answer with this instead.
    Rejected(Response),
    /// Peer closed, idle timeout or shutdown.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Router, config: ConnectionConfig, cancel: CancellationToken) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            framer: config.framer,
            state: ConnectionState::Reading,
            router,
            config,
            cancel,
        }
    }

    /// Serves requests in arrival order until the peer goes away, the
    /// connection idles out, shutdown is requested or the stream breaks.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Incoming::Request(req) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Incoming::Rejected(response) => {
                        let close = response.close;
                        self.state = ConnectionState::Writing(ResponseWriter::new(&response), close);
                    }
                    Incoming::Closed => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let mut response = self.router.dispatch(req).await;
                    if req.wants_close() {
                        response = response.closing();
                    }

                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    let close = response.close;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response), close);
                }

                ConnectionState::Writing(writer, close) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("failed to send response")?;

                    if *close {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::Reading;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        // The peer may already be gone; nothing left to report in that case.
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Frames and parses the next request, reading from the socket only when
    /// the buffer holds no complete request.
    async fn read_request(&mut self) -> anyhow::Result<Incoming> {
        loop {
            match self.framer.next_frame(&mut self.buffer) {
                Ok(Some(frame)) => {
                    return Ok(match parse_request(&frame, &self.config.header_limits) {
                        Ok(req) => Incoming::Request(req),
                        Err(e) => {
                            tracing::warn!(error = %e, "Rejected malformed request");
                            Incoming::Rejected(Response::bad_request("Invalid Request Format"))
                        }
                    });
                }

                Ok(None) => {
                    // Partial headers or body → read more
                }

                Err(e) => {
                    tracing::warn!(error = %e, "Framing error, closing connection");
                    let reason = match e {
                        FrameError::RequestTooLong { .. } => "Request Too Long",
                        _ => "Invalid Content-Length",
                    };
                    return Ok(Incoming::Rejected(Response::bad_request(reason).closing()));
                }
            }

            self.buffer.reserve(READ_CHUNK);

            let read = tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Connection cancelled");
                    return Ok(Incoming::Closed);
                }
                res = timeout(self.config.read_timeout, self.stream.read_buf(&mut self.buffer)) => res,
            };

            let n = match read {
                Ok(res) => res.context("failed to read from connection")?,
                Err(_) => {
                    tracing::debug!(timeout = ?self.config.read_timeout, "Connection idle, closing");
                    self.cancel.cancel();
                    return Ok(Incoming::Closed);
                }
            };

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(pending = self.buffer.len(), "Peer closed with an incomplete request");
                }
                return Ok(Incoming::Closed);
            }
        }
    }
}
