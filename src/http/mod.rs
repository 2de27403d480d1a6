//! HTTP/1.0 protocol implementation.
//!
//! Each accepted connection carries exactly one request and one response.
//!
//! # Architecture
//!
//! - **`tokenizer`**: Delimiter-bounded tokens over a fixed-capacity socket buffer
//! - **`parser`**: Request-line and header state machine driven by the tokenizer
//! - **`request`**: Parsed request representation
//! - **`resolver`**: Maps request targets to files and their metadata
//! - **`response`**: Status codes and response header blocks
//! - **`writer`**: Composes and writes headers, reports errors
//! - **`transfer`**: Streams files to the socket and uploads to files
//! - **`connection`**: Per-connection state machine tying the above together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Tokenize and parse the request head
//!        └──────┬──────┘
//!               │ Request parsed          (malformed → 400/405, Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Look up the target on disk
//!        └──────┬───────────┘
//!               │ File found              (missing → 404, Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Headers, then GET body / POST upload
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use minihttpd::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = std::sync::Arc::new(minihttpd::config::Config::default());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let config = config.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, config).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod tokenizer;
pub mod transfer;
pub mod writer;
