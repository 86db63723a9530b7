//! UseCase: 参加者接続処理（Connection Admission Gate）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - WebSocket 接続の受付判定と、ローカルセッションへの登録
//!
//! ### なぜこのテストが必要か
//! - ルームの参加確認が唯一の認可の仕組み
//! - 拒否した接続は決して登録されてはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者として登録済みの接続はちょうど 1 回登録される
//! - 異常系：パラメータ欠落、存在しないルーム、非参加者、ストアの障害

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::{ParticipantName, RoomName, RoomRepository},
    infrastructure::session::{LocalSessionRegistry, SessionHandle},
};

use super::error::ConnectError;

/// 受付済みの接続
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub room: String,
    pub participant: ParticipantName,
    /// ローカルセッションの ID（切断時に使う）
    pub session_id: Uuid,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    sessions: Arc<LocalSessionRegistry>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, sessions: Arc<LocalSessionRegistry>) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// 接続の受付判定を行い、通過した場合のみローカルセッションに登録する
    ///
    /// # Arguments
    ///
    /// * `room` - 接続要求のルーム名
    /// * `participant` - 接続要求の参加者名
    /// * `sender` - この接続へのメッセージ送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - 受付・登録済み
    /// * `Err(ConnectError)` - 拒否（登録はされない）
    pub async fn execute(
        &self,
        room: Option<&str>,
        participant: Option<&str>,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<Admission, ConnectError> {
        // 1. パラメータの確認
        let requested = room
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(ConnectError::MissingParameters)?;
        let participant = participant
            .and_then(|p| ParticipantName::new(p.to_string()).ok())
            .ok_or(ConnectError::MissingParameters)?;

        // 2. ルームの存在確認（ルーム名として不正なら作成され得ない）
        let room = RoomName::new(requested.to_string())
            .map_err(|_| ConnectError::RoomNotFound(requested.to_string()))?;
        if !self.repository.room_exists(room.as_str()).await? {
            return Err(ConnectError::RoomNotFound(room.into_string()));
        }

        // 3. 参加確認
        if !self
            .repository
            .is_participant_in_room(room.as_str(), participant.as_str())
            .await?
        {
            return Err(ConnectError::ParticipantNotMember {
                room: room.into_string(),
                participant: participant.into_string(),
            });
        }

        // 4. 登録
        let handle = SessionHandle::new(participant.as_str(), sender);
        let session_id = handle.id();
        self.sessions.add_connection(room.as_str(), handle).await;

        Ok(Admission {
            room: room.into_string(),
            participant,
            session_id,
        })
    }
}
