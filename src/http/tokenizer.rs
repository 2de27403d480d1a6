//! Delimiter-driven tokenizer over a buffered socket.
//!
//! The reader keeps a fixed-capacity buffer and a cursor marking the first
//! unconsumed byte. A token is only handed out once its terminating delimiter
//! is in the buffer (or the peer has closed), so a token whose bytes arrive in
//! two separate reads is never split.

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Delimiters separating request-line fields and header tokens.
pub const REQUEST_DELIMITERS: &[u8] = b" \r\n";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("initial read returned no data")]
    NoData,
    #[error("token exceeds the {limit} byte buffer")]
    TooLong { limit: usize },
    #[error("socket read failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct TokenReader<S> {
    stream: S,
    buffer: BytesMut,
    /// Index of the first unconsumed byte in `buffer`.
    cursor: usize,
    capacity: usize,
    last_delimiter: Option<u8>,
    eof: bool,
}

impl<S> TokenReader<S>
where
    S: AsyncRead + Unpin,
{
    pub fn new(stream: S, capacity: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(capacity),
            cursor: 0,
            capacity,
            last_delimiter: None,
            eof: false,
        }
    }

    /// Performs the first read of a connection. A peer that sends nothing
    /// before closing, or a failing socket, is reported as an error here.
    pub async fn prime(&mut self) -> Result<usize, TokenError> {
        match self.refill().await? {
            0 => Err(TokenError::NoData),
            n => Ok(n),
        }
    }

    /// Returns the next token bounded by any byte in `delimiters`.
    ///
    /// A delimiter directly following another yields the empty token. Once
    /// the peer has closed, whatever is left is returned as the final token and
    /// every later call yields the empty token.
    pub async fn next_token(&mut self, delimiters: &[u8]) -> Result<&[u8], TokenError> {
        loop {
            let start = self.cursor;
            let found = self.buffer[start..]
                .iter()
                .position(|b| delimiters.contains(b));

            if let Some(offset) = found {
                let end = start + offset;
                self.last_delimiter = Some(self.buffer[end]);
                self.cursor = end + 1;
                return Ok(&self.buffer[start..end]);
            }

            if self.eof {
                let end = self.buffer.len();
                self.last_delimiter = None;
                self.cursor = end;
                return Ok(&self.buffer[start..end]);
            }

            if self.buffer.len() - start >= self.capacity {
                return Err(TokenError::TooLong {
                    limit: self.capacity,
                });
            }

            self.refill().await?;
        }
    }

    /// The delimiter that ended the most recent token, if any.
    pub fn last_delimiter(&self) -> Option<u8> {
        self.last_delimiter
    }

    /// Bytes received but not yet handed out as tokens.
    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.cursor..]
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Releases the stream together with the unconsumed bytes.
    pub fn into_parts(mut self) -> (S, BytesMut) {
        self.buffer.advance(self.cursor);
        (self.stream, self.buffer)
    }

    /// Drops consumed bytes, then reads once into the free space after the
    /// unconsumed tail. Returns the number of bytes read.
    async fn refill(&mut self) -> Result<usize, TokenError> {
        self.buffer.advance(self.cursor);
        self.cursor = 0;

        let room = self.capacity - self.buffer.len();
        self.buffer.reserve(room);

        let n = (&mut self.stream)
            .take(room as u64)
            .read_buf(&mut self.buffer)
            .await?;

        if n == 0 {
            self.eof = true;
        }
        tracing::trace!(read = n, buffered = self.buffer.len(), "refilled token buffer");
        Ok(n)
    }
}
