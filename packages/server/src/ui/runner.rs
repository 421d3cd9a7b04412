//! Server bootstrap.

use std::{future::Future, io, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{EngineConfig, ServerConfig},
    infrastructure::repository::InMemorySessionRepository,
    ui::{
        handler::{engine_handler, health_check, list_namespaces},
        signal::shutdown_signal,
        state::AppState,
    },
    usecase::NamespaceRegistry,
};

/// Bind the configured address and serve until Ctrl-C / SIGTERM.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Socket.IO server listening on {}", listener.local_addr()?);

    serve(listener, config.engine(), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, engine: EngineConfig, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let state = Arc::new(AppState {
        repository: Arc::new(InMemorySessionRepository::new()),
        namespaces: Arc::new(NamespaceRegistry::with_defaults()),
        engine,
        shutdown: shutdown_rx,
    });

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            // Upgraded connections are not tracked by axum; tell them directly
            let _ = shutdown_tx.send(true);
        })
        .await
}

/// Build the router: Engine.IO endpoint, debug API, permissive CORS.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/socket.io", get(engine_handler))
        .route("/socket.io/", get(engine_handler))
        .route("/api/health", get(health_check))
        .route("/api/namespaces", get(list_namespaces))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
