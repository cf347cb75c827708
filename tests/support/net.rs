use std::net::{SocketAddr, TcpListener};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use liquid_swap::bus::client::SwapClient;

pub fn free_local_addr() -> Result<SocketAddr> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind ephemeral port")?;
    listener.local_addr().context("read local addr")
}

/// Retries until the server behind `addr` accepts connections.
pub async fn connect_client(addr: SocketAddr, timeout: Duration) -> Result<SwapClient> {
    let url = format!("http://{addr}");
    let deadline = Instant::now() + timeout;
    let mut sleep_for = Duration::from_millis(50);

    loop {
        match SwapClient::connect(url.clone()).await {
            Ok(client) => return Ok(client),
            Err(err) if Instant::now() >= deadline => {
                return Err(err).with_context(|| format!("server at {addr} never came up"));
            }
            Err(_) => {}
        }

        tokio::time::sleep(sleep_for).await;
        sleep_for = (sleep_for * 2).min(Duration::from_millis(500));
    }
}
