use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response: status line, `Content-Length`, `Connection`, blank
/// line, body.
pub fn serialize_response(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(96 + resp.body.len());

    // Status line
    let head = format!(
        "{} {} {}\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        resp.body.len(),
        if resp.close { "close" } else { "keep-alive" },
    );
    buf.put_slice(head.as_bytes());

    // Body
    buf.put_slice(&resp.body);

    buf
}

/// Writes a serialized response, all of it or an error.
pub struct ResponseWriter {
    buffer: BytesMut,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Bytes still to be written.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!(
                    "connection closed while writing, {} bytes unsent",
                    self.remaining()
                ));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
