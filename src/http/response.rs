use std::time::SystemTime;

/// HTTP status codes the server produces.
///
/// - `Ok` (200): Request served
/// - `BadRequest` (400): Malformed request line or header
/// - `NotFound` (404): Target does not resolve to a file
/// - `MethodNotAllowed` (405): Method other than GET, HEAD or POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

/// Reason phrase used for codes outside the table.
pub const UNKNOWN_REASON: &str = "Unknown Status";

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            404 => Some(StatusCode::NotFound),
            405 => Some(StatusCode::MethodNotAllowed),
            _ => None,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// Reason phrase for an arbitrary numeric code, with a fixed fallback for
/// codes the server never emits.
pub fn reason_phrase_for(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .map(|status| status.reason_phrase())
        .unwrap_or(UNKNOWN_REASON)
}

/// Value of the `Server` header.
pub fn server_identity() -> String {
    format!("{}/{} (Unix)", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Header block of a response. Headers keep insertion order on the wire.
#[derive(Debug)]
pub struct ResponseHead {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
}

/// Builder for the header block of a successful response.
///
/// # Example
///
/// ```ignore
/// let head = ResponseBuilder::new(StatusCode::Ok)
///     .header("Connection", "close")
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Appends a header. Names are written exactly as given.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn date_header(self, key: &str, time: SystemTime) -> Self {
        self.header(key, httpdate::fmt_http_date(time))
    }

    pub fn build(self) -> ResponseHead {
        ResponseHead {
            status: self.status,
            headers: self.headers,
        }
    }
}

impl ResponseHead {
    /// A status-only head, as used for error reports.
    pub fn status_only(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
