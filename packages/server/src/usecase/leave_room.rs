//! UseCase: ルーム退出処理

use std::sync::Arc;

use crate::domain::{ParticipantName, RoomRepository};

use super::{error::UseCaseError, require_room};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームから参加者を外す
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 参加者を削除した
    /// * `Ok(false)` - もともと参加していなかった（参加者数は変わらない）
    pub async fn execute(&self, room: &str, participant: String) -> Result<bool, UseCaseError> {
        let room = require_room(self.repository.as_ref(), room).await?;
        let participant = ParticipantName::new(participant)?;
        Ok(self
            .repository
            .remove_participant(&room, &participant)
            .await?)
    }
}
