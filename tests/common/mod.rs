//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::ETAG;
use serde_json::Value;
use shopping_lists::config::ServerConfig;
use shopping_lists::http::HttpServer;
use shopping_lists::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    /// Boot a server with a fresh store.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Boot a server after adjusting the default config.
    pub async fn start_with(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut config = ServerConfig::default();
        configure(&mut config);
        config.listener.bind_address = addr.to_string();
        config.listener.public_url = Some(format!("http://{}", addr));

        let shutdown = Shutdown::new();
        let server = HttpServer::new(config).unwrap();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        Self { addr, client, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a list and return its id (from Location) and ETag.
    #[allow(dead_code)]
    pub async fn create_list(&self, body: Value) -> (u64, String) {
        let res = self.client.post(self.url("/shoppinglists")).json(&body).send().await.unwrap();
        assert_eq!(res.status(), 201);
        let etag = etag(&res);
        let location = res.headers()["location"].to_str().unwrap().to_string();
        let id = location.rsplit('/').next().unwrap().parse().unwrap();
        (id, etag)
    }

    /// GET a resource and return its ETag and body.
    #[allow(dead_code)]
    pub async fn fetch(&self, path: &str) -> (String, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "GET {} failed", path);
        let etag = etag(&res);
        (etag, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// The ETag header of a response.
pub fn etag(res: &reqwest::Response) -> String {
    res.headers()
        .get(ETAG)
        .expect("response carries an ETag")
        .to_str()
        .unwrap()
        .to_string()
}

/// Parse an ETag header value.
#[allow(dead_code)]
pub fn version(etag: &str) -> u64 {
    etag.parse().expect("ETag is a decimal integer")
}
