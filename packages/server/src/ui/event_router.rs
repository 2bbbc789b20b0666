//! Routes real-time events from connections to the use cases and emits the results.
//!
//! The router is the only component that talks to the broadcast-group transport.
//! Every event is handled under `dispatch_lock`, so the "check lock, mutate,
//! persist, emit" sequence is atomic and broadcasts go out in commit order.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, LockDenied, MessagePusher, PusherChannel, RoomId, TimerSnapshot, ViewState,
    },
    infrastructure::dto::websocket::{
        ClientEvent, EmptyPayload, GotoPayload, LockDeniedPayload, PointerMovePayload,
        ReportNumPagesPayload, RoomPayload, ServerEvent, StepPayload, SyncPayload,
        TimerErrorPayload, TimerUpdatePayload,
    },
    usecase::{
        JoinRoomError, JoinRoomUseCase, NavigationUseCase, PointerRelayUseCase,
        PresenterLockUseCase, TimerUseCase, TimerUseCaseError,
    },
};

/// Use cases the router dispatches to
pub struct EventRouterDeps {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub navigation_usecase: Arc<NavigationUseCase>,
    pub presenter_lock_usecase: Arc<PresenterLockUseCase>,
    pub timer_usecase: Arc<TimerUseCase>,
    pub pointer_relay_usecase: Arc<PointerRelayUseCase>,
    pub message_pusher: Arc<dyn MessagePusher>,
}

pub struct EventRouter {
    deps: EventRouterDeps,
    dispatch_lock: Mutex<()>,
}

enum Target<'a> {
    Caller(&'a ConnectionId),
    Room(&'a RoomId),
}

impl EventRouter {
    pub fn new(deps: EventRouterDeps) -> Self {
        Self {
            deps,
            dispatch_lock: Mutex::new(()),
        }
    }

    /// Register a freshly upgraded connection
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.deps
            .message_pusher
            .register_client(connection_id, sender)
            .await;
    }

    /// Parse one inbound text frame and dispatch it. Malformed frames are dropped.
    pub async fn handle_text(&self, from: &ConnectionId, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(from, event).await,
            Err(e) => {
                tracing::debug!("Dropped malformed event from '{}': {}", from, e);
            }
        }
    }

    pub async fn dispatch(&self, from: &ConnectionId, event: ClientEvent) {
        let _serialized = self.dispatch_lock.lock().await;
        tracing::debug!("Event '{}' from '{}'", event.name(), from);

        match event {
            ClientEvent::Join(RoomPayload { room }) => self.on_join(from, &room).await,
            ClientEvent::ReportNumPages(ReportNumPagesPayload { room, num_pages }) => {
                match self
                    .deps
                    .navigation_usecase
                    .report_num_pages(&room, num_pages)
                    .await
                {
                    Ok(view) => self.emit_sync(Target::Room(&room), &view).await,
                    Err(e) => tracing::debug!("Dropped report_num_pages for '{}': {}", room, e),
                }
            }
            ClientEvent::Goto(GotoPayload { room, page }) => {
                let result = self.deps.navigation_usecase.goto(&room, from, page).await;
                self.emit_navigation(from, &room, result.map(Some)).await;
            }
            ClientEvent::Step(StepPayload { room, delta }) => {
                let result = self.deps.navigation_usecase.step(&room, from, delta).await;
                self.emit_navigation(from, &room, result).await;
            }
            ClientEvent::Lock(RoomPayload { room }) => {
                let view = self.deps.presenter_lock_usecase.lock(&room, from).await;
                self.emit_sync(Target::Room(&room), &view).await;
            }
            ClientEvent::Unlock(RoomPayload { room }) => {
                if let Some(view) = self.deps.presenter_lock_usecase.unlock(&room, from).await {
                    self.emit_sync(Target::Room(&room), &view).await;
                }
            }
            ClientEvent::ForceUnlock(RoomPayload { room }) => {
                let view = self.deps.presenter_lock_usecase.force_unlock(&room).await;
                self.emit_sync(Target::Room(&room), &view).await;
            }
            ClientEvent::TimerStart(RoomPayload { room }) => {
                let result = self.deps.timer_usecase.start(&room).await;
                self.emit_timer(from, &room, result).await;
            }
            ClientEvent::TimerStop(RoomPayload { room }) => {
                let result = self.deps.timer_usecase.stop(&room).await;
                self.emit_timer(from, &room, result).await;
            }
            ClientEvent::TimerReset(RoomPayload { room }) => {
                let result = self.deps.timer_usecase.reset(&room).await;
                self.emit_timer(from, &room, result).await;
            }
            ClientEvent::PointerMove(PointerMovePayload { room, x, y, page }) => {
                if let Some(pointer) = self
                    .deps
                    .pointer_relay_usecase
                    .move_pointer(&room, from, x, y, page)
                    .await
                {
                    self.emit(Target::Room(&room), ServerEvent::PointerUpdate(pointer.into()))
                        .await;
                }
            }
            ClientEvent::PointerHide(RoomPayload { room }) => {
                if self.deps.pointer_relay_usecase.hide_pointer(&room, from).await {
                    self.emit(Target::Room(&room), ServerEvent::PointerHide(EmptyPayload {}))
                        .await;
                }
            }
        }
    }

    /// Forget a closed connection and release every lock it held
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        let _serialized = self.dispatch_lock.lock().await;

        self.deps
            .message_pusher
            .unregister_client(connection_id)
            .await;

        let released = self
            .deps
            .presenter_lock_usecase
            .release_all(connection_id)
            .await;
        for (room, view) in &released {
            tracing::info!(
                "Lock on room '{}' released after '{}' disconnected",
                room,
                connection_id
            );
            self.emit_sync(Target::Room(room), view).await;
        }
    }

    async fn on_join(&self, from: &ConnectionId, room: &RoomId) {
        let view = match self.deps.join_room_usecase.execute(room).await {
            Ok(view) => view,
            Err(JoinRoomError::RoomNotFound(_)) => {
                tracing::warn!("Connection '{}' tried to join unknown room '{}'", from, room);
                return;
            }
            Err(e @ JoinRoomError::Directory(_)) => {
                tracing::error!("Join of room '{}' by '{}' failed: {}", room, from, e);
                return;
            }
        };

        if let Err(e) = self.deps.message_pusher.join_group(room, from).await {
            tracing::warn!("Connection '{}' could not join room '{}': {}", from, room, e);
            return;
        }
        tracing::info!("Connection '{}' joined room '{}'", from, room);

        self.emit_sync(Target::Caller(from), &view).await;
        let timer = self.deps.timer_usecase.snapshot(room).await;
        match timer {
            Ok(snapshot) => self.emit_timer_snapshot(Target::Caller(from), &snapshot).await,
            Err(e) => self.emit_timer_error(from, room, e).await,
        }
    }

    async fn emit_navigation(
        &self,
        from: &ConnectionId,
        room: &RoomId,
        result: Result<Option<ViewState>, LockDenied>,
    ) {
        match result {
            Ok(Some(view)) => self.emit_sync(Target::Room(room), &view).await,
            Ok(None) => {}
            Err(denied) => {
                tracing::debug!("Navigation by '{}' in room '{}' denied: {}", from, room, denied);
                self.emit(
                    Target::Caller(from),
                    ServerEvent::LockDenied(LockDeniedPayload::from(&denied)),
                )
                .await;
            }
        }
    }

    async fn emit_timer(
        &self,
        from: &ConnectionId,
        room: &RoomId,
        result: Result<TimerSnapshot, TimerUseCaseError>,
    ) {
        match result {
            Ok(snapshot) => self.emit_timer_snapshot(Target::Room(room), &snapshot).await,
            Err(e) => self.emit_timer_error(from, room, e).await,
        }
    }

    async fn emit_timer_error(&self, from: &ConnectionId, room: &RoomId, error: TimerUseCaseError) {
        tracing::error!("Timer operation on room '{}' failed: {}", room, error);
        self.emit(
            Target::Caller(from),
            ServerEvent::TimerError(TimerErrorPayload {
                message: error.to_string(),
            }),
        )
        .await;
    }

    async fn emit_sync(&self, target: Target<'_>, view: &ViewState) {
        self.emit(target, ServerEvent::Sync(SyncPayload::from(view)))
            .await;
    }

    async fn emit_timer_snapshot(&self, target: Target<'_>, snapshot: &TimerSnapshot) {
        self.emit(
            target,
            ServerEvent::TimerUpdate(TimerUpdatePayload::from(snapshot)),
        )
        .await;
    }

    async fn emit(&self, target: Target<'_>, event: ServerEvent) {
        let json = match event.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                return;
            }
        };

        let pusher = &self.deps.message_pusher;
        let result = match target {
            Target::Caller(connection_id) => pusher.push_to(connection_id, &json).await,
            Target::Room(room) => pusher.broadcast_to_group(room, &json).await.map(|_| ()),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to emit event: {}", e);
        }
    }
}
