//! UseCase: 参加者切断処理
//!
//! ローカルセッションの登録を解除するだけで、ルームの参加者（メンバーシップ）は変更しない。

use std::sync::Arc;

use uuid::Uuid;

use crate::infrastructure::session::LocalSessionRegistry;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    sessions: Arc<LocalSessionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(sessions: Arc<LocalSessionRegistry>) -> Self {
        Self { sessions }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 登録されていたセッションを解除した場合は `true`
    /// （配信時に切断済みとして既に取り除かれていた場合は `false`）
    pub async fn execute(&self, room: &str, session_id: Uuid) -> bool {
        self.sessions.remove_connection(room, session_id).await
    }
}
