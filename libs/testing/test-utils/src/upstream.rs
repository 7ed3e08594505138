//! In-process HTTP upstreams for cross-service tests.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A router served on `127.0.0.1:<random port>`, aborted on drop.
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use test_utils::spawn_upstream;
///
/// # async fn example() {
/// let upstream = spawn_upstream(Router::new().route("/ping", get(|| async { "pong" }))).await;
/// let url = upstream.url("/ping");
/// # }
/// ```
pub struct TestUpstream {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestUpstream {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl Drop for TestUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_upstream(router: Router) -> TestUpstream {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test upstream");
    let addr = listener.local_addr().expect("Failed to read upstream address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    TestUpstream { addr, handle }
}

/// Base URL of a port nothing listens on, for transport-failure tests.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to read probe address");
    drop(listener);
    format!("http://{}", addr)
}
