mod list;
mod response;
mod scalar;
#[cfg(test)]
mod test_util;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::store::{ListStore, ScalarStore};

pub use response::{ApiError, decode_body};

/// Stores shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<ListStore>,
    pub scalars: Arc<dyn ScalarStore>,
}

impl AppState {
    pub fn new(lists: Arc<ListStore>, scalars: Arc<dyn ScalarStore>) -> Self {
        Self { lists, scalars }
    }
}

/// Build the HTTP routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(scalar::health))
        // scalars
        .route("/scalar/get/{key}", get(scalar::get_scalar))
        .route("/scalar/set/{key}", put(scalar::set_scalar))
        // lists
        .route("/list/lpush/{key}", post(list::lpush))
        .route("/list/rpush/{key}", post(list::rpush))
        .route("/list/raddtoset/{key}", post(list::raddtoset))
        .route("/list/lpop/{key}", post(list::lpop))
        .route("/list/rpop/{key}", post(list::rpop))
        .route("/list/lset/{key}", put(list::lset))
        .route("/list/lget/{key}/{index}", get(list::lget))
        .route("/list/range/{key}", get(list::range))
        .route("/list/len/{key}", get(list::len))
        .with_state(state)
}

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Create and bind HTTP server to specified address
    pub async fn bind(addr: &str, state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started, listening on {}", self.local_addr);

        let app = router(self.state).layer(TraceLayer::new_for_http());
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server on {} stopped", self.local_addr);
        Ok(())
    }
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
