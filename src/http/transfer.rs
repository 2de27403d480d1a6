//! Entity body streaming between files and the socket.

use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Streams the first `size` bytes of the file at `path` to `stream`.
///
/// Returns the number of bytes sent. A file that turns out shorter than
/// `size` is logged and leaves the body truncated.
pub async fn send_file<W>(
    stream: &mut W,
    path: &Path,
    size: u64,
    chunk_size: usize,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(path).await?;
    let mut chunk = vec![0u8; chunk_size];
    let mut sent: u64 = 0;

    while sent < size {
        let want = usize::try_from(size - sent).map_or(chunk_size, |left| left.min(chunk_size));
        let n = file.read(&mut chunk[..want]).await?;
        if n == 0 {
            tracing::warn!(
                path = %path.display(),
                expected = size,
                sent,
                "file shrank while sending, body truncated"
            );
            break;
        }
        stream.write_all(&chunk[..n]).await?;
        sent += n as u64;
    }

    stream.flush().await?;
    Ok(sent)
}

/// Appends everything the peer sends to the file at `path`, creating it if
/// needed. `buffered` holds body bytes that arrived together with the headers;
/// `skip_line_feed` drops a leading LF left over from the header terminator.
///
/// The upload ends when the peer half-closes or a socket read fails. Returns
/// the number of bytes appended.
pub async fn receive_upload<R>(
    stream: &mut R,
    buffered: &[u8],
    mut skip_line_feed: bool,
    path: &Path,
    chunk_size: usize,
) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(buffered).await?;
    let mut received = buffered.len() as u64;

    let mut chunk = vec![0u8; chunk_size];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "upload read ended with error");
                break;
            }
        };
        let start = usize::from(skip_line_feed && chunk[0] == b'\n');
        skip_line_feed = false;
        file.write_all(&chunk[start..n]).await?;
        received += (n - start) as u64;
    }

    file.flush().await?;
    Ok(received)
}
