use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use minihttpd::http::request::{Method, Request, Version};
use minihttpd::http::resolver::Resource;
use minihttpd::http::response::{
    ResponseBuilder, ResponseHead, StatusCode, UNKNOWN_REASON, reason_phrase_for,
    server_identity,
};
use minihttpd::http::writer::{compose_success, serialize_head};

fn request(method: Method, target: &str) -> Request {
    Request {
        method,
        target: target.to_string(),
        version: Version::Http11,
        host: None,
    }
}

fn resource(size: u64) -> Resource {
    Resource {
        path: PathBuf::from("./file"),
        size,
        modified: SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777),
    }
}

#[test]
fn test_status_code_values() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
}

#[test]
fn test_status_reason_phrases() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
}

#[test]
fn test_reason_phrase_for_unknown_code_falls_back() {
    assert_eq!(reason_phrase_for(404), "Not Found");
    assert_eq!(reason_phrase_for(500), UNKNOWN_REASON);
    assert_eq!(reason_phrase_for(0), UNKNOWN_REASON);
}

#[test]
fn test_status_from_u16_round_trips_known_codes() {
    for status in [
        StatusCode::Ok,
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::MethodNotAllowed,
    ] {
        assert_eq!(StatusCode::from_u16(status.as_u16()), Some(status));
    }
    assert_eq!(StatusCode::from_u16(302), None);
}

#[test]
fn test_error_head_serialization() {
    let bytes = serialize_head(&ResponseHead::status_only(StatusCode::NotFound));
    assert_eq!(bytes, b"HTTP/1.0 404 Not Found\r\n\r\n");
}

#[test]
fn test_builder_date_header_uses_rfc1123() {
    let head = ResponseBuilder::new(StatusCode::Ok)
        .date_header("Date", SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777))
        .build();
    assert_eq!(head.header("Date"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
}

#[test]
fn test_compose_get_headers_in_order() {
    let head = compose_success(&request(Method::GET, "/file"), &resource(42), SystemTime::now());

    let names: Vec<&str> = head.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Date",
            "Server",
            "Transfer-Encoding",
            "Connection",
            "Last-Modified",
            "Content-Length"
        ]
    );
    assert_eq!(head.header("Server"), Some(server_identity().as_str()));
    assert_eq!(head.header("Last-Modified"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    assert_eq!(head.header("Content-Length"), Some("42"));
}

#[test]
fn test_compose_jpeg_content_type() {
    for target in ["/a.jpg", "/b.jpeg"] {
        let head = compose_success(&request(Method::HEAD, target), &resource(1), SystemTime::now());
        assert_eq!(head.header("Content-Type"), Some("image/jpeg"));
    }

    for target in ["/a.png", "/a.JPG", "/jpg", "/a.jpg.txt"] {
        let head = compose_success(&request(Method::GET, target), &resource(1), SystemTime::now());
        assert_eq!(head.header("Content-Type"), None, "{target}");
    }
}

#[test]
fn test_compose_post_has_no_resource_headers() {
    let head = compose_success(&request(Method::POST, "/up.jpg"), &resource(9), SystemTime::now());

    assert_eq!(head.header("Connection"), Some("close"));
    assert_eq!(head.header("Last-Modified"), None);
    assert_eq!(head.header("Content-Type"), None);
    assert_eq!(head.header("Content-Length"), None);
}

#[test]
fn test_success_status_line_is_http10() {
    let head = compose_success(&request(Method::GET, "/f"), &resource(0), SystemTime::now());
    let text = String::from_utf8(serialize_head(&head)).unwrap();

    assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(text.ends_with("Content-Length: 0\r\n\r\n"));
}
