pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::store::{StoreError, TaskStore};

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("could not open task store: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state. Each store operation is a single statement, so a
/// plain mutex around the connection is enough; handlers never hold the lock
/// across an await.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TaskStore>>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Build the API router. Cross-origin requests are permitted from any origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            put(handlers::edit_task).delete(handlers::delete_task),
        )
        .route("/api/tasks/{id}/toggle", put(handlers::toggle_task))
        .layer(cors)
        .with_state(state)
}

/// Open the store and serve the API until the process is stopped. Failure to
/// open the store is fatal; nothing else brings the server down.
pub async fn serve(port: u16, db_path: &str) -> Result<(), ServeError> {
    let store = TaskStore::open(db_path)?;
    let state = AppState::new(store);
    let app = router(state);

    let addr = bind_addr(port);
    let listener = TcpListener::bind(addr).await?;
    info!("serving tasks from {} on http://{}", db_path, addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Entry point for the sync CLI: builds a runtime and runs `serve` on it.
pub fn run_blocking(port: u16, db_path: &str) -> Result<(), ServeError> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(port, db_path))
}

/// Listen on all interfaces: CORS is open to any origin, so clients on other
/// hosts are expected.
fn bind_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_listens_on_all_interfaces() {
        let addr = bind_addr(3000);
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 3000);
    }
}
