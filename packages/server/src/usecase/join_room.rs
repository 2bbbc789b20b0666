//! UseCase: 部屋への参加
//!
//! 部屋ディレクトリで存在を確認し、現在の ViewState を返します。
//! ブロードキャストグループへの登録は呼び出し側（EventRouter）が行います。

use std::sync::Arc;

use crate::domain::{RoomDirectory, RoomId, ViewState, ViewStateRepository};

use super::error::JoinRoomError;

/// 部屋参加のユースケース
pub struct JoinRoomUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    view_states: Arc<dyn ViewStateRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        view_states: Arc<dyn ViewStateRepository>,
    ) -> Self {
        Self {
            room_directory,
            view_states,
        }
    }

    /// 部屋参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ViewState)` - 参加者に送る現在の ViewState
    /// * `Err(JoinRoomError)` - 部屋が存在しない、またはディレクトリが参照できない
    pub async fn execute(&self, room: &RoomId) -> Result<ViewState, JoinRoomError> {
        let exists = self
            .room_directory
            .room_exists(room)
            .await
            .map_err(JoinRoomError::Directory)?;
        if !exists {
            return Err(JoinRoomError::RoomNotFound(room.as_str().to_string()));
        }

        Ok(self.view_states.get_or_create(room).await)
    }
}
