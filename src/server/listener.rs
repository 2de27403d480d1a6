use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, Outcome};

pub async fn bind(cfg: &Config) -> anyhow::Result<TcpListener> {
    let addr = cfg.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let local = listener.local_addr()?;
    if cfg.server.port == 0 {
        info!("Listening on port {}", local.port());
    } else {
        info!("Listening on {}", local);
    }
    Ok(listener)
}

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = bind(&cfg).await?;
    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection.
///
/// Without `server.max_connections` the number of live tasks is unbounded;
/// with it, accepting pauses until a running connection finishes.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    let limit = cfg.server.max_connections.map(|n| Arc::new(Semaphore::new(n)));

    loop {
        let permit = match &limit {
            Some(sem) => Some(
                sem.clone()
                    .acquire_owned()
                    .await
                    .context("connection limiter closed")?,
            ),
            None => None,
        };

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let cfg = cfg.clone();
        tokio::spawn(async move {
            handle(socket, peer, cfg).await;
            drop(permit);
        });
    }
}

async fn handle(socket: TcpStream, peer: SocketAddr, cfg: Arc<Config>) {
    let conn = Connection::new(socket, cfg.clone());

    let result = match cfg.server.client_timeout() {
        Some(limit) => match tokio::time::timeout(limit, conn.run()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%peer, "Connection timed out after {:?}", limit);
                return;
            }
        },
        None => conn.run().await,
    };

    match result {
        Ok(Outcome::Served {
            method,
            target,
            bytes,
        }) => {
            info!(%peer, %method, request_target = %target, status = 200, bytes, "served");
        }
        Ok(Outcome::Rejected { status, reason }) => {
            info!(%peer, status = status.as_u16(), %reason, "rejected");
        }
        Err(e) => {
            error!("Connection error from {}: {}", peer, e);
        }
    }
}
