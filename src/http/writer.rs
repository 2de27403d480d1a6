//! Response composition and the error reporter.
//!
//! Every header block is serialized into one buffer and handed to the socket
//! with a single `write_all`, so a peer never sees half a header set from us.

use std::time::SystemTime;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::request::Request;
use crate::http::resolver::Resource;
use crate::http::response::{ResponseBuilder, ResponseHead, StatusCode, server_identity};

/// Responses always carry this version, whatever the client asked for.
const HTTP_VERSION: &str = "HTTP/1.0";

pub fn serialize_head(head: &ResponseHead) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    for (k, v) in &head.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");
    buf
}

/// Builds the 200 header block for `request`.
///
/// GET and HEAD additionally describe the file: Last-Modified, a JPEG
/// Content-Type when the target ends in `.jpg`/`.jpeg`, and Content-Length.
pub fn compose_success(request: &Request, resource: &Resource, now: SystemTime) -> ResponseHead {
    let mut builder = ResponseBuilder::new(StatusCode::Ok)
        .date_header("Date", now)
        .header("Server", server_identity())
        .header("Transfer-Encoding", "identity")
        .header("Connection", "close");

    if request.method.describes_resource() {
        builder = builder.date_header("Last-Modified", resource.modified);
        if request.is_jpeg() {
            builder = builder.header("Content-Type", "image/jpeg");
        }
        builder = builder.header("Content-Length", resource.size.to_string());
    }

    builder.build()
}

pub async fn write_head<W>(stream: &mut W, head: &ResponseHead) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&serialize_head(head)).await?;
    stream.flush().await
}

/// Sends a status-only response and closes the write half.
///
/// Failures are only logged: the connection is being torn down either way.
pub async fn report_error<W>(stream: &mut W, status: StatusCode)
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = write_head(stream, &ResponseHead::status_only(status)).await {
        tracing::debug!(status = status.as_u16(), error = %e, "failed to send error status");
    }
    if let Err(e) = stream.shutdown().await {
        tracing::trace!(error = %e, "shutdown after error status failed");
    }
}
