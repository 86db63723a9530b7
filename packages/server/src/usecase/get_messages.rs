//! UseCase: メッセージ履歴取得処理

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RoomRepository};

use super::{error::UseCaseError, require_room};

/// メッセージ履歴取得のユースケース
pub struct GetMessagesUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    /// 新しい GetMessagesUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { rooms, messages }
    }

    /// 履歴を古い順に取得
    ///
    /// # Arguments
    ///
    /// * `limit` - 取得件数。未指定なら全件
    /// * `offset` - 先頭からの開始位置（0 始まり）
    pub async fn execute(
        &self,
        room: &str,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, UseCaseError> {
        let room = require_room(self.rooms.as_ref(), room).await?;
        Ok(self.messages.page(room.as_str(), limit, offset).await?)
    }
}
