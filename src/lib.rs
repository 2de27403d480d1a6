//! minihttpd - single-request-per-connection HTTP/1.0 file server
//!
//! Serves files by name with GET and HEAD and appends uploads with POST.

pub mod config;
pub mod http;
pub mod server;
