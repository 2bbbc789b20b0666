//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{domain::ViewStateRepository, usecase::GetRoomDetailUseCase};

use super::{
    event_router::EventRouter,
    handler::{get_room_detail, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Upper bound on how often idle rooms are swept
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Slide sync server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(event_router, get_room_detail_usecase, view_states, room_idle);
/// server.run("127.0.0.1".to_string(), 14341).await?;
/// ```
pub struct Server {
    /// EventRouter（リアルタイムイベントの振り分け）
    event_router: Arc<EventRouter>,
    /// GetRoomDetailUseCase（部屋詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// ViewState のストア（アイドル破棄と終了処理に使う）
    view_states: Arc<dyn ViewStateRepository>,
    /// この時間参照されていない部屋の ViewState は破棄される
    room_idle: Duration,
}

impl Server {
    pub fn new(
        event_router: Arc<EventRouter>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        view_states: Arc<dyn ViewStateRepository>,
        room_idle: Duration,
    ) -> Self {
        Self {
            event_router,
            get_room_detail_usecase,
            view_states,
            room_idle,
        }
    }

    /// Build the HTTP router with every endpoint mounted
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            event_router: self.event_router.clone(),
            get_room_detail_usecase: self.get_room_detail_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Slide sync server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let sweeper = spawn_idle_sweeper(self.view_states.clone(), self.room_idle);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        self.view_states.teardown().await;
        served?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Periodically forget rooms nobody has touched for `room_idle`.
fn spawn_idle_sweeper(
    view_states: Arc<dyn ViewStateRepository>,
    room_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    let period = (room_idle / 4).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = view_states.evict_idle(room_idle).await;
            if evicted > 0 {
                tracing::info!("Evicted {} idle room(s) from view state cache", evicted);
            }
        }
    })
}
