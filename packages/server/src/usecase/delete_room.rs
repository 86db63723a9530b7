//! UseCase: ルーム削除処理

use std::sync::Arc;

use crate::domain::RoomRepository;

use super::error::UseCaseError;

/// ルーム削除のユースケース
pub struct DeleteRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl DeleteRoomUseCase {
    /// 新しい DeleteRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// メタデータ・参加者・メッセージ履歴をまとめて削除する
    pub async fn execute(&self, room: &str) -> Result<(), UseCaseError> {
        Ok(self.repository.remove_room(room).await?)
    }
}
