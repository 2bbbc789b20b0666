//! UseCase: 部屋の詳細取得（HTTP API 用）
//!
//! ViewState は参照のみで、保持していない部屋はデフォルト値を返します。
//! タイマーも参照のみで、保存されていない部屋は停止・0ms を返します（行は作成しません）。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, TimerSnapshot, ViewState, ViewStateRepository};

use super::{TimerUseCase, error::TimerUseCaseError};

/// 部屋の詳細
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDetail {
    pub room: RoomId,
    pub connections: usize,
    pub view: ViewState,
    pub timer: TimerSnapshot,
}

/// 部屋詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    view_states: Arc<dyn ViewStateRepository>,
    timer_usecase: Arc<TimerUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(
        view_states: Arc<dyn ViewStateRepository>,
        timer_usecase: Arc<TimerUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            view_states,
            timer_usecase,
            message_pusher,
        }
    }

    pub async fn execute(&self, room: RoomId) -> Result<RoomDetail, TimerUseCaseError> {
        let view = self.view_states.find(&room).await.unwrap_or_default();
        let timer = self.timer_usecase.peek(&room).await?;
        let connections = self.message_pusher.group_members(&room).await.len();
        Ok(RoomDetail {
            room,
            connections,
            view,
            timer,
        })
    }
}
