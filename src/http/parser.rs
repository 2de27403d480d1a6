//! Request parsing state machine.
//!
//! The parser pulls tokens one at a time from a [`TokenReader`] and walks
//! `Start -> Method -> Target -> Version -> Headers -> Done`. Any failure
//! leaves the machine through the returned error; the caller decides whether
//! the peer gets a status line.

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::http::request::{Method, Request, Version};
use crate::http::response::StatusCode;
use crate::http::tokenizer::{REQUEST_DELIMITERS, TokenError, TokenReader};

/// Consecutive empty tokens that mark the end of the header section.
const BLANK_LINE_RUN: u8 = 2;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported method {0:?}")]
    InvalidMethod(String),
    #[error("empty request target")]
    MissingTarget,
    #[error("request target is not valid UTF-8")]
    InvalidTarget,
    #[error("unsupported protocol version {0:?}")]
    InvalidVersion(String),
    #[error("Host header without a value")]
    EmptyHost,
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl ParseError {
    /// Status to report to the client, or `None` for local-only failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::InvalidMethod(_) => Some(StatusCode::MethodNotAllowed),
            ParseError::MissingTarget
            | ParseError::InvalidTarget
            | ParseError::InvalidVersion(_)
            | ParseError::EmptyHost
            | ParseError::Token(TokenError::TooLong { .. }) => Some(StatusCode::BadRequest),
            ParseError::Token(TokenError::NoData | TokenError::Io(_)) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Start,
    Method,
    Target,
    Version,
    /// `empty_run` counts consecutive empty tokens seen so far.
    Headers { empty_run: u8 },
    Done,
}

/// Parsed request plus what the caller needs to find the body.
#[derive(Debug)]
pub struct ParsedRequest {
    pub request: Request,
    /// The blank line ended on CR, so its LF is still unread.
    pub owes_line_feed: bool,
}

pub struct RequestParser {
    state: ParseState,
    method: Option<Method>,
    target: Option<String>,
    version: Version,
    host: Option<String>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Start,
            method: None,
            target: None,
            version: Version::Http10,
            host: None,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Drives the state machine until the header section is complete.
    pub async fn parse<S>(mut self, reader: &mut TokenReader<S>) -> Result<ParsedRequest, ParseError>
    where
        S: AsyncRead + Unpin,
    {
        loop {
            match self.state {
                ParseState::Start => {
                    self.state = ParseState::Method;
                }

                ParseState::Method => {
                    let token = reader.next_token(REQUEST_DELIMITERS).await?;
                    let method = Method::from_bytes(token).ok_or_else(|| {
                        ParseError::InvalidMethod(String::from_utf8_lossy(token).into_owned())
                    })?;
                    self.method = Some(method);
                    self.state = ParseState::Target;
                }

                ParseState::Target => {
                    let token = reader.next_token(REQUEST_DELIMITERS).await?;
                    if token.is_empty() {
                        return Err(ParseError::MissingTarget);
                    }
                    let target =
                        std::str::from_utf8(token).map_err(|_| ParseError::InvalidTarget)?;
                    self.target = Some(target.to_string());
                    self.state = ParseState::Version;
                }

                ParseState::Version => {
                    let token = reader.next_token(REQUEST_DELIMITERS).await?;
                    self.version = Version::from_bytes(token).ok_or_else(|| {
                        ParseError::InvalidVersion(String::from_utf8_lossy(token).into_owned())
                    })?;
                    // An omitted version is the first half of the blank line.
                    let empty_run = u8::from(token.is_empty());
                    self.state = ParseState::Headers { empty_run };
                }

                ParseState::Headers { empty_run } if empty_run >= BLANK_LINE_RUN => {
                    self.state = ParseState::Done;
                }

                ParseState::Headers { empty_run } => {
                    let token = reader.next_token(REQUEST_DELIMITERS).await?;
                    if token.is_empty() {
                        self.state = ParseState::Headers {
                            empty_run: empty_run + 1,
                        };
                        continue;
                    }

                    if token == b"Host:" {
                        let value = reader.next_token(REQUEST_DELIMITERS).await?;
                        if value.is_empty() {
                            return Err(ParseError::EmptyHost);
                        }
                        self.host = Some(String::from_utf8_lossy(value).into_owned());
                    }
                    self.state = ParseState::Headers { empty_run: 0 };
                }

                ParseState::Done => {
                    return self.finish(reader.last_delimiter() == Some(b'\r'));
                }
            }
        }
    }

    fn finish(self, owes_line_feed: bool) -> Result<ParsedRequest, ParseError> {
        let (Some(method), Some(target)) = (self.method, self.target) else {
            return Err(ParseError::MissingTarget);
        };
        Ok(ParsedRequest {
            request: Request {
                method,
                target,
                version: self.version,
                host: self.host,
            },
            owes_line_feed,
        })
    }
}
