//! UseCase: ルーム参加処理

use std::sync::Arc;

use crate::domain::{ParticipantName, RoomRepository};

use super::{error::UseCaseError, require_room};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// 検証順序: ルームの存在 → 参加者名 → 重複参加。
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantName)` - 参加した参加者名（前後の空白を除去済み）
    /// * `Err(UseCaseError)` - ルームが存在しない / 参加者名が空 / 参加済み
    pub async fn execute(
        &self,
        room: &str,
        participant: String,
    ) -> Result<ParticipantName, UseCaseError> {
        let room = require_room(self.repository.as_ref(), room).await?;
        let participant = ParticipantName::new(participant)?;
        self.repository.join_room(&room, &participant).await?;
        Ok(participant)
    }
}
