use minihttpd::http::parser::{ParseError, RequestParser};
use minihttpd::http::request::{Method, Version};
use minihttpd::http::response::StatusCode;
use minihttpd::http::tokenizer::{TokenError, TokenReader};

async fn parse(input: &'static [u8]) -> Result<minihttpd::http::parser::ParsedRequest, ParseError> {
    let mut reader = TokenReader::new(input, 256);
    reader.prime().await?;
    RequestParser::new().parse(&mut reader).await
}

#[tokio::test]
async fn test_parse_simple_get_request() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").await.unwrap();

    assert_eq!(parsed.request.method, Method::GET);
    assert_eq!(parsed.request.target, "/");
    assert_eq!(parsed.request.version, Version::Http11);
    assert_eq!(parsed.request.host.as_deref(), Some("example.com"));
    assert!(parsed.owes_line_feed);
}

#[tokio::test]
async fn test_parse_head_and_post() {
    let head = parse(b"HEAD /a.txt HTTP/1.0\r\n\r\n").await.unwrap();
    assert_eq!(head.request.method, Method::HEAD);

    let post = parse(b"POST /upload HTTP/1.0\r\n\r\n").await.unwrap();
    assert_eq!(post.request.method, Method::POST);
    assert_eq!(post.request.target, "/upload");
}

#[tokio::test]
async fn test_parse_missing_version_defaults_to_http10() {
    let parsed = parse(b"GET /index.html\r\n\r\n").await.unwrap();

    assert_eq!(parsed.request.version, Version::Http10);
    assert_eq!(parsed.request.target, "/index.html");
}

#[tokio::test]
async fn test_parse_ignores_other_headers() {
    let parsed = parse(
        b"GET /path HTTP/1.0\r\nUser-Agent: test client\r\nAccept: */*\r\nHost: h.example\r\n\r\n",
    )
    .await
    .unwrap();

    assert_eq!(parsed.request.target, "/path");
    assert_eq!(parsed.request.host.as_deref(), Some("h.example"));
}

#[tokio::test]
async fn test_parse_without_host_header() {
    let parsed = parse(b"GET /x HTTP/1.0\r\n\r\n").await.unwrap();
    assert_eq!(parsed.request.host, None);
}

#[tokio::test]
async fn test_parse_request_cut_short_by_close() {
    let parsed = parse(b"GET /x HTTP/1.0\r\n").await.unwrap();

    assert_eq!(parsed.request.target, "/x");
    assert!(!parsed.owes_line_feed);
}

#[tokio::test]
async fn test_parse_invalid_http_method() {
    let err = parse(b"PUT /x HTTP/1.0\r\n\r\n").await.unwrap_err();

    assert!(matches!(err, ParseError::InvalidMethod(ref m) if m == "PUT"));
    assert_eq!(err.status(), Some(StatusCode::MethodNotAllowed));
}

#[tokio::test]
async fn test_parse_method_is_case_sensitive() {
    let err = parse(b"get /x HTTP/1.0\r\n\r\n").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::MethodNotAllowed));
}

#[tokio::test]
async fn test_parse_empty_target() {
    let err = parse(b"GET  HTTP/1.0\r\n\r\n").await.unwrap_err();

    assert!(matches!(err, ParseError::MissingTarget));
    assert_eq!(err.status(), Some(StatusCode::BadRequest));
}

#[tokio::test]
async fn test_parse_unknown_version() {
    let err = parse(b"GET /x HTTP/2.0\r\n\r\n").await.unwrap_err();

    assert!(matches!(err, ParseError::InvalidVersion(ref v) if v == "HTTP/2.0"));
    assert_eq!(err.status(), Some(StatusCode::BadRequest));
}

#[tokio::test]
async fn test_parse_empty_host_value() {
    let err = parse(b"GET /x HTTP/1.0\r\nHost:\r\n\r\n").await.unwrap_err();

    assert!(matches!(err, ParseError::EmptyHost));
    assert_eq!(err.status(), Some(StatusCode::BadRequest));
}

#[tokio::test]
async fn test_parse_non_utf8_target() {
    let err = parse(b"GET /\xff\xfe HTTP/1.0\r\n\r\n").await.unwrap_err();
    assert!(matches!(err, ParseError::InvalidTarget));
}

#[tokio::test]
async fn test_parse_overlong_target_is_bad_request() {
    let mut input = b"GET /".to_vec();
    input.extend(std::iter::repeat_n(b'a', 64));
    input.extend_from_slice(b" HTTP/1.0\r\n\r\n");

    let mut reader = TokenReader::new(&input[..], 32);
    reader.prime().await.unwrap();
    let err = RequestParser::new().parse(&mut reader).await.unwrap_err();

    assert!(matches!(err, ParseError::Token(TokenError::TooLong { limit: 32 })));
    assert_eq!(err.status(), Some(StatusCode::BadRequest));
}

#[tokio::test]
async fn test_parse_leaves_body_bytes_unconsumed() {
    let mut reader = TokenReader::new(&b"POST /f HTTP/1.0\r\nHost: h\r\n\r\nhello"[..], 256);
    reader.prime().await.unwrap();
    let parsed = RequestParser::new().parse(&mut reader).await.unwrap();

    assert!(parsed.owes_line_feed);
    assert_eq!(reader.remaining(), b"\nhello");
}

#[test]
fn test_io_failures_are_local_only() {
    let err = ParseError::Token(TokenError::Io(std::io::Error::other("reset")));
    assert_eq!(err.status(), None);

    let err = ParseError::Token(TokenError::NoData);
    assert_eq!(err.status(), None);
}
