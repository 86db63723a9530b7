//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 検証（ルームの存在・参加者名・本文・参加確認）→ 履歴への追加 → 配信
//!
//! ### なぜこのテストが必要か
//! - 参加していない参加者のメッセージは履歴にも配信にも乗ってはいけない
//! - 配信の失敗は呼び出し元に返すが、追加済みの履歴は取り消さない
//!
//! ### どのような状況を想定しているか
//! - 正常系：lobby に alice が "hi" を送信し、履歴とチャンネルの両方に届く
//! - 異常系：存在しないルーム、空の本文、非参加者、配信基盤の障害

use std::sync::Arc;

use crate::domain::{
    ChatMessage, MessageContent, MessagePublisher, MessageRepository, ParticipantName,
    RoomRepository, Timestamp,
};

use super::{error::UseCaseError, require_room};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    publisher: Arc<dyn MessagePublisher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        messages: Arc<dyn MessageRepository>,
        publisher: Arc<dyn MessagePublisher>,
    ) -> Self {
        Self {
            rooms,
            messages,
            publisher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信先のルーム名
    /// * `participant` - 送信者の参加者名
    /// * `content` - メッセージ本文
    /// * `timestamp` - 送信時刻（ミリ秒）。未指定ならサーバー側で付与
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加し、配信したメッセージ
    /// * `Err(UseCaseError)` - 検証失敗、または Shared Store の障害
    pub async fn execute(
        &self,
        room: &str,
        participant: String,
        content: String,
        timestamp: Option<i64>,
    ) -> Result<ChatMessage, UseCaseError> {
        // 1. 検証
        let room = require_room(self.rooms.as_ref(), room).await?;
        let participant = ParticipantName::new(participant)?;
        let content = MessageContent::new(content)?;
        if !self
            .rooms
            .is_participant_in_room(room.as_str(), participant.as_str())
            .await?
        {
            return Err(UseCaseError::ParticipantNotMember {
                room: room.into_string(),
                participant: participant.into_string(),
            });
        }

        // 2. 履歴に追加（永続的な記録）
        let message = ChatMessage::stamped(participant, content, timestamp.map(Timestamp::new));
        self.messages.append(room.as_str(), &message).await?;

        // 3. 全ノードへ配信（ベストエフォート。失敗しても履歴は残る）
        if let Err(e) = self.publisher.publish(room.as_str(), &message).await {
            tracing::error!(
                "Message from '{}' stored in room '{}' but could not be published: {}",
                message.participant,
                room,
                e
            );
            return Err(e.into());
        }

        Ok(message)
    }
}
