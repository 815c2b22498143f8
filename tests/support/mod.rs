#![allow(dead_code)]

use golem_population::server::serve_on;
use golem_population::AppConfig;
use axum::Router;
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A server bound to an ephemeral loopback port, stopped on drop.
pub struct RunningServer {
    pub addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

pub async fn spawn(app: Router) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = serve_on(listener, app, async move {
            let _ = stop_rx.await;
        })
        .await;
    });

    RunningServer {
        addr,
        stop: Some(stop_tx),
    }
}

/// Config with a throwaway database and the given rival URL.
pub fn test_config(dir: &TempDir, rival_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.database_url = dir
        .path()
        .join("population_data.db")
        .to_str()
        .unwrap()
        .to_string();
    config.rival.url = rival_url.to_string();
    config.rival.timeout_ms = 300;
    config
}
