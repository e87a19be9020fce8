use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::trace;

/// One request/response exchange with a server. The resolver applies
/// its own timeout around this, so implementations just do the I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, payload: &[u8], server: SocketAddr) -> io::Result<Vec<u8>>;
}

/// Plain UDP transport. A fresh ephemeral socket per exchange keeps
/// responses from one server from ever being read as another's.
#[derive(Debug, Default)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        UdpTransport
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(&self, payload: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(server).await?;
        socket.send(payload).await?;

        let mut buf = vec![0u8; 65535];
        let len = socket.recv(&mut buf).await?;
        buf.truncate(len);
        trace!(%server, sent = payload.len(), received = len, "udp exchange");
        Ok(buf)
    }
}
