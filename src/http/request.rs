use std::fmt;

/// HTTP request methods the server understands.
///
/// Anything else on the request line is answered with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Append the request body to a file
    POST,
}

/// Protocol versions accepted on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// Represents a parsed HTTP request line plus the headers the server reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The raw request target as sent (e.g., "/index.html")
    pub target: String,
    /// Version from the request line, HTTP/1.0 when omitted
    pub version: Version,
    /// Value of the Host header, if one was sent
    pub host: Option<String>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::request::Method;
    /// assert_eq!(Method::from_bytes(b"GET"), Some(Method::GET));
    /// assert_eq!(Method::from_bytes(b"get"), None);
    /// ```
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"GET" => Some(Method::GET),
            b"HEAD" => Some(Method::HEAD),
            b"POST" => Some(Method::POST),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
        }
    }

    /// Whether the response describes the file (Last-Modified, Content-Length).
    pub fn describes_resource(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Version {
    /// Parses a version token. An empty token means the client omitted the
    /// version and is treated as HTTP/1.0.
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"" | b"HTTP/1.0" => Some(Version::Http10),
            b"HTTP/1.1" => Some(Version::Http11),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl Request {
    /// True when the target names a JPEG by its extension.
    pub fn is_jpeg(&self) -> bool {
        self.target.ends_with(".jpg") || self.target.ends_with(".jpeg")
    }
}
