use std::sync::Arc;
use std::time::SystemTime;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::http::parser::{ParseError, ParsedRequest, RequestParser};
use crate::http::request::Method;
use crate::http::resolver::{self, ResolveError, Resource};
use crate::http::response::StatusCode;
use crate::http::tokenizer::{TokenError, TokenReader};
use crate::http::transfer;
use crate::http::writer;

/// Failures that end a connection without a status line being sent.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("initial read failed: {0}")]
    InitialRead(TokenError),
    #[error("reading request failed: {0}")]
    Read(ParseError),
    #[error("writing response head failed: {0}")]
    WriteHead(std::io::Error),
    #[error("{method} body transfer failed after headers were sent: {source}")]
    Transfer {
        method: Method,
        source: std::io::Error,
    },
}

/// How a connection that did not fail locally ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A 200 response went out; `bytes` counts body bytes sent or received.
    Served {
        method: Method,
        target: String,
        bytes: u64,
    },
    /// An error status was reported to the client.
    Rejected { status: StatusCode, reason: String },
}

pub struct Connection<S> {
    reader: TokenReader<S>,
    config: Arc<Config>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Resolving(ParsedRequest),
    Responding(ParsedRequest, Resource),
    Closed(Outcome),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            reader: TokenReader::new(stream, config.server.buffer_size),
            config,
            state: ConnectionState::Reading,
        }
    }

    /// Serves exactly one request and closes the connection.
    pub async fn run(mut self) -> Result<Outcome, ConnectionError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Reading) {
                ConnectionState::Reading => {
                    self.reader
                        .prime()
                        .await
                        .map_err(ConnectionError::InitialRead)?;

                    let parsed = RequestParser::new().parse(&mut self.reader).await;
                    match parsed {
                        Ok(parsed) => {
                            tracing::debug!(
                                method = %parsed.request.method,
                                request_target = %parsed.request.target,
                                version = parsed.request.version.as_str(),
                                host = parsed.request.host.as_deref().unwrap_or("-"),
                                "request parsed"
                            );
                            self.state = ConnectionState::Resolving(parsed);
                        }
                        Err(e) => match e.status() {
                            Some(status) => {
                                self.state = self.reject(status, e.to_string()).await;
                            }
                            None => return Err(ConnectionError::Read(e)),
                        },
                    }
                }

                ConnectionState::Resolving(parsed) => {
                    let resolved =
                        resolver::resolve(&self.config.static_files.root, &parsed.request.target)
                            .await;
                    match resolved {
                        Ok(resource) => {
                            self.state = ConnectionState::Responding(parsed, resource);
                        }
                        Err(e) => {
                            if let ResolveError::Escapes(target) = &e {
                                tracing::warn!(request_target = %target, "refusing target outside served root");
                            }
                            self.state = self.reject(StatusCode::NotFound, e.to_string()).await;
                        }
                    }
                }

                ConnectionState::Responding(parsed, resource) => {
                    return self.respond(parsed, resource).await;
                }

                ConnectionState::Closed(outcome) => {
                    return Ok(outcome);
                }
            }
        }
    }

    async fn reject(&mut self, status: StatusCode, reason: String) -> ConnectionState {
        writer::report_error(self.reader.get_mut(), status).await;
        ConnectionState::Closed(Outcome::Rejected { status, reason })
    }

    async fn respond(
        self,
        parsed: ParsedRequest,
        resource: Resource,
    ) -> Result<Outcome, ConnectionError> {
        let ParsedRequest {
            request,
            owes_line_feed,
        } = parsed;
        let chunk_size = self.config.server.chunk_size;
        let head = writer::compose_success(&request, &resource, SystemTime::now());

        let (mut stream, buffered) = self.reader.into_parts();
        writer::write_head(&mut stream, &head)
            .await
            .map_err(ConnectionError::WriteHead)?;

        let transferred = match request.method {
            Method::GET => {
                transfer::send_file(&mut stream, &resource.path, resource.size, chunk_size).await
            }
            Method::HEAD => Ok(0),
            Method::POST => {
                let (body, still_owed) = match buffered.first() {
                    Some(b'\n') if owes_line_feed => (&buffered[1..], false),
                    None => (&buffered[..], owes_line_feed),
                    _ => (&buffered[..], false),
                };
                transfer::receive_upload(&mut stream, body, still_owed, &resource.path, chunk_size)
                    .await
            }
        };

        let bytes = transferred.map_err(|source| ConnectionError::Transfer {
            method: request.method,
            source,
        })?;

        if let Err(e) = stream.shutdown().await {
            tracing::trace!(error = %e, "shutdown after response failed");
        }

        Ok(Outcome::Served {
            method: request.method,
            target: request.target,
            bytes,
        })
    }
}
