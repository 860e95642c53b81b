//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        get_history, get_presence, health_check, list_conversations, list_users, mark_as_read,
        post_message, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Messaging and presence server
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(registry, users, messages, pusher, Arc::new(SystemClock));
/// Server::new(Arc::new(state)).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Build the axum router with every route and the HTTP trace layer
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages/send", post(post_message))
            .route("/api/messages/conversations", get(list_conversations))
            .route("/api/messages/users", get(list_users))
            .route("/api/messages/{user_id}", get(get_history))
            .route("/api/messages/read/{user_id}", put(mark_as_read))
            .route("/api/presence/{user_id}", get(get_presence))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on an already-bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        tracing::info!(
            "Neighborly messaging server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Run the server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        self.serve(listener).await
    }
}
