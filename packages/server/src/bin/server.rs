//! Real-time slide synchronization server.
//!
//! Keeps every room's page, presenter lock and elapsed timer in sync across
//! the clients connected to it.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kamishibai-server
//! cargo run --bin kamishibai-server -- --host 0.0.0.0 --port 14341 --database kamishibai.db
//! ```

use std::{num::NonZeroUsize, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use kamishibai_server::{
    domain::{RoomDirectory, TimerRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryTimerRepository, InMemoryViewStateRepository, OpenRoomDirectory, SqliteStore,
        },
    },
    ui::{EventRouter, EventRouterDeps, Server},
    usecase::{
        GetRoomDetailUseCase, JoinRoomUseCase, NavigationUseCase, PointerRelayUseCase,
        PresenterLockUseCase, TimerUseCase,
    },
};
use kamishibai_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kamishibai-server")]
#[command(about = "Real-time slide synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "KAMISHIBAI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "KAMISHIBAI_PORT", default_value = "14341")]
    port: u16,

    /// SQLite database holding timers (and rooms). Timers are kept in memory if omitted
    #[arg(long, env = "KAMISHIBAI_DATABASE")]
    database: Option<PathBuf>,

    /// Only allow joining rooms present in the database's `rooms` table
    #[arg(long, env = "KAMISHIBAI_RESTRICTED_ROOMS", requires = "database")]
    restricted_rooms: bool,

    /// Maximum number of rooms whose view state is kept in memory
    #[arg(long, env = "KAMISHIBAI_ROOM_CACHE_CAPACITY", default_value = "1024")]
    room_cache_capacity: NonZeroUsize,

    /// Forget a room's view state after this many seconds without activity
    #[arg(long, env = "KAMISHIBAI_ROOM_IDLE_SECS", default_value = "21600")]
    room_idle_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. UseCases
    // 4. EventRouter
    // 5. Server

    // 1. Create Repositories
    let view_states = Arc::new(InMemoryViewStateRepository::new(args.room_cache_capacity));
    let mut timers: Arc<dyn TimerRepository> = Arc::new(InMemoryTimerRepository::new());
    let mut room_directory: Arc<dyn RoomDirectory> = Arc::new(OpenRoomDirectory);
    match &args.database {
        Some(path) => {
            let store = match SqliteStore::open(path) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!("Failed to open database '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            tracing::info!("Timers persisted to '{}'", path.display());
            if args.restricted_rooms {
                tracing::info!("Joins restricted to rooms listed in the database");
                room_directory = store.clone();
            }
            timers = store;
        }
        None => tracing::info!("No database configured; timers are kept in memory"),
    }

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(room_directory, view_states.clone()));
    let navigation_usecase = Arc::new(NavigationUseCase::new(view_states.clone()));
    let presenter_lock_usecase = Arc::new(PresenterLockUseCase::new(view_states.clone()));
    let timer_usecase = Arc::new(TimerUseCase::new(timers, Arc::new(SystemClock)));
    let pointer_relay_usecase = Arc::new(PointerRelayUseCase::new(view_states.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(
        view_states.clone(),
        timer_usecase.clone(),
        message_pusher.clone(),
    ));

    // 4. Create EventRouter
    let event_router = Arc::new(EventRouter::new(EventRouterDeps {
        join_room_usecase,
        navigation_usecase,
        presenter_lock_usecase,
        timer_usecase,
        pointer_relay_usecase,
        message_pusher,
    }));

    // 5. Create and run the server
    let server = Server::new(
        event_router,
        get_room_detail_usecase,
        view_states,
        Duration::from_secs(args.room_idle_secs),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
