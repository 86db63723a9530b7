//! Node startup: store wiring, broadcast subscriber, router and serve loop.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;

use crate::{
    ServerError,
    config::{ServerConfig, StoreBackend},
    infrastructure::{
        broadcast::BroadcastSubscriber,
        store::{InMemorySharedStore, RedisSharedStore, SharedStore},
    },
    ui::{
        handler::{
            create_room, delete_room, delete_without_room_id, get_messages, get_room_detail,
            health_check, join_room, leave_room, send_message, websocket_handler,
        },
        signal::shutdown_signal,
        state::AppState,
    },
};

const ROOMS_PATH: &str = "/api/chatapp/chatrooms";

/// Build the application router
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            ROOMS_PATH,
            post(create_room).delete(delete_without_room_id),
        )
        .route(
            &format!("{ROOMS_PATH}/"),
            post(create_room).delete(delete_without_room_id),
        )
        .route(
            &format!("{ROOMS_PATH}/{{room}}"),
            get(get_room_detail).delete(delete_room),
        )
        .route(&format!("{ROOMS_PATH}/{{room}}/join"), post(join_room))
        .route(
            &format!("{ROOMS_PATH}/{{room}}/participants/{{participant}}"),
            delete(leave_room),
        )
        .route(
            &format!("{ROOMS_PATH}/{{room}}/messages"),
            get(get_messages).post(send_message),
        )
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A server node bound to its listener, with the broadcast subscriber running
pub struct Node {
    listener: TcpListener,
    state: Arc<AppState>,
    subscriber: JoinHandle<()>,
}

impl Node {
    /// Wire the node on top of `store` and start listening to room channels.
    ///
    /// The subscription is active when this returns.
    pub async fn start(
        listener: TcpListener,
        store: Arc<dyn SharedStore>,
        node_id: impl Into<String>,
    ) -> Result<Self, ServerError> {
        let state = Arc::new(AppState::new(store.clone(), node_id));
        let subscriber = BroadcastSubscriber::new(store, state.sessions.clone())
            .start()
            .await?;
        Ok(Self {
            listener,
            state,
            subscriber,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Serve HTTP and WebSocket requests until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Node {
            listener,
            state,
            subscriber,
        } = self;

        tracing::info!(
            "Node {} listening on {}",
            state.sessions.node_id(),
            listener.local_addr()?
        );
        let result = axum::serve(listener, create_app(state))
            .with_graceful_shutdown(shutdown)
            .await;

        subscriber.abort();
        tracing::info!("Broadcast subscriber stopped");
        result.map_err(ServerError::from)
    }
}

/// Run a node as configured until Ctrl+C or SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let store: Arc<dyn SharedStore> = match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; messages will not reach other nodes");
            Arc::new(InMemorySharedStore::new())
        }
        StoreBackend::Redis => Arc::new(RedisSharedStore::connect(&config.redis_url).await?),
    };

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let port = listener.local_addr()?.port();
    let node = Node::start(listener, store, config.resolve_node_id(port)).await?;
    node.serve(shutdown_signal()).await
}
