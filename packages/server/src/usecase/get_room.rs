//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{MessageRepository, RoomMetadata, RoomRepository};

use super::error::UseCaseError;

/// ルームの詳細（メタデータ・参加者一覧・メッセージ件数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub metadata: RoomMetadata,
    /// 参加者名（ソート済み）
    pub participants: Vec<String>,
    pub message_count: u64,
}

/// ルーム詳細取得のユースケース
pub struct GetRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetRoomUseCase {
    /// 新しい GetRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { rooms, messages }
    }

    /// ルーム詳細を取得
    pub async fn execute(&self, room: &str) -> Result<RoomDetail, UseCaseError> {
        let metadata = self.rooms.get_room(room).await?;
        let participants = self.rooms.get_participants(room).await?;
        let message_count = self.messages.count(room).await?;

        Ok(RoomDetail {
            metadata,
            participants,
            message_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatMessage, MessageContent, ParticipantName, Timestamp},
        usecase::{ErrorKind, test_support::Fixture},
    };

    #[tokio::test]
    async fn test_get_room_detail() {
        // テスト項目: メタデータ・参加者・メッセージ件数がまとめて取得できる
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.room_with("lobby", &["carol", "alice"]).await;
        for i in 0..3 {
            let message = ChatMessage::new(
                ParticipantName::new("alice".to_string()).unwrap(),
                MessageContent::new(format!("m{i}")).unwrap(),
                Timestamp::new(i),
            );
            fixture.messages.append("lobby", &message).await.unwrap();
        }
        let usecase = GetRoomUseCase::new(fixture.rooms.clone(), fixture.messages.clone());

        // when (操作):
        let detail = usecase.execute("lobby").await.unwrap();

        // then (期待する結果):
        assert_eq!(detail.metadata.name.as_str(), "lobby");
        assert_eq!(detail.metadata.participant_count, 2);
        assert_eq!(detail.participants, vec!["alice", "carol"]);
        assert_eq!(detail.message_count, 3);
    }

    #[tokio::test]
    async fn test_get_missing_room() {
        // テスト項目: 存在しないルームの詳細取得は NotFound になる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = GetRoomUseCase::new(fixture.rooms.clone(), fixture.messages.clone());

        // when (操作):
        let result = usecase.execute("ghost").await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
