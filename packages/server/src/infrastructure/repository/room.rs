//! Room Registry 実装
//!
//! ルームのメタデータ（ハッシュ）と参加者（セット）を Shared Store 上で管理します。
//! ルームの存在はメタデータのキーの有無のみで判定し、メモリ上にはキャッシュしません。
//!
//! ## 既知の整合性ギャップ
//!
//! - `create_room` は存在確認と書き込みの 2 段階で、ノード間でアトミックではない。
//!   同名ルームを同時に作成すると両方が確認を通過し、後の書き込みが勝つ。
//! - 参加者数は独立したカウンタ。セットの更新結果（追加・削除が実際に起きたか）
//!   でのみ増減するため重複参加では狂わないが、2 つの書き込みの間で失敗すると
//!   セットの要素数とずれる可能性がある。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{
        ParticipantName, RepositoryError, RoomMetadata, RoomName, RoomRepository, Timestamp,
    },
    infrastructure::store::{
        SharedStore,
        keys::{
            FIELD_CREATED_AT, FIELD_PARTICIPANT_COUNT, FIELD_ROOM_NAME, messages_key,
            participants_key, room_key,
        },
    },
};

/// Shared Store を使った Room Registry
pub struct StoreRoomRepository {
    store: Arc<dyn SharedStore>,
}

impl StoreRoomRepository {
    /// 新しい StoreRoomRepository を作成
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoomRepository for StoreRoomRepository {
    async fn create_room(&self, name: &RoomName) -> Result<RoomMetadata, RepositoryError> {
        let key = room_key(name.as_str());
        if self.store.exists(&key).await? {
            return Err(RepositoryError::RoomAlreadyExists(name.to_string()));
        }

        let metadata = RoomMetadata::new(name.clone(), Timestamp::now());
        self.store
            .hash_set_all(
                &key,
                vec![
                    (FIELD_ROOM_NAME.to_string(), name.to_string()),
                    (
                        FIELD_CREATED_AT.to_string(),
                        metadata.created_at.value().to_string(),
                    ),
                    (
                        FIELD_PARTICIPANT_COUNT.to_string(),
                        metadata.participant_count.to_string(),
                    ),
                ],
            )
            .await?;

        tracing::info!("Chat room '{}' created", name);
        Ok(metadata)
    }

    async fn room_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.exists(&room_key(name)).await?)
    }

    async fn get_room(&self, name: &str) -> Result<RoomMetadata, RepositoryError> {
        let fields = self.store.hash_get_all(&room_key(name)).await?;
        if fields.is_empty() {
            return Err(RepositoryError::RoomNotFound(name.to_string()));
        }

        let require = |field: &str| {
            fields.get(field).ok_or_else(|| {
                RepositoryError::Serialization(format!(
                    "room '{name}' metadata is missing field '{field}'"
                ))
            })
        };
        let room_name = RoomName::new(require(FIELD_ROOM_NAME)?.clone())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let created_at = require(FIELD_CREATED_AT)?
            .parse::<i64>()
            .map_err(|e| RepositoryError::Serialization(format!("createdAt: {e}")))?;
        let participant_count = require(FIELD_PARTICIPANT_COUNT)?
            .parse::<i64>()
            .map_err(|e| RepositoryError::Serialization(format!("participantCount: {e}")))?;

        Ok(RoomMetadata {
            name: room_name,
            created_at: Timestamp::new(created_at),
            participant_count,
        })
    }

    async fn join_room(
        &self,
        name: &RoomName,
        participant: &ParticipantName,
    ) -> Result<(), RepositoryError> {
        if !self.room_exists(name.as_str()).await? {
            return Err(RepositoryError::RoomNotFound(name.to_string()));
        }

        let added = self
            .store
            .set_add(&participants_key(name.as_str()), participant.as_str())
            .await?;
        if !added {
            return Err(RepositoryError::ParticipantAlreadyJoined {
                room: name.to_string(),
                participant: participant.to_string(),
            });
        }

        self.store
            .hash_increment(&room_key(name.as_str()), FIELD_PARTICIPANT_COUNT, 1)
            .await?;
        tracing::info!("Participant '{}' joined room '{}'", participant, name);
        Ok(())
    }

    async fn remove_participant(
        &self,
        name: &RoomName,
        participant: &ParticipantName,
    ) -> Result<bool, RepositoryError> {
        let removed = self
            .store
            .set_remove(&participants_key(name.as_str()), participant.as_str())
            .await?;
        if !removed {
            return Ok(false);
        }

        self.store
            .hash_increment(&room_key(name.as_str()), FIELD_PARTICIPANT_COUNT, -1)
            .await?;
        tracing::info!("Participant '{}' left room '{}'", participant, name);
        Ok(true)
    }

    async fn is_participant_in_room(
        &self,
        name: &str,
        participant: &str,
    ) -> Result<bool, RepositoryError> {
        let participant = participant.trim();
        if participant.is_empty() || !self.room_exists(name).await? {
            return Ok(false);
        }
        Ok(self
            .store
            .set_is_member(&participants_key(name), participant)
            .await?)
    }

    async fn get_participants(&self, name: &str) -> Result<Vec<String>, RepositoryError> {
        let mut participants = self.store.set_members(&participants_key(name)).await?;
        participants.sort();
        Ok(participants)
    }

    async fn remove_room(&self, name: &str) -> Result<(), RepositoryError> {
        let room = room_key(name);
        let participants = participants_key(name);
        let messages = messages_key(name);

        if !self.store.exists(&room).await? {
            return Err(RepositoryError::RoomNotFound(name.to_string()));
        }
        let has_participants = self.store.exists(&participants).await?;
        let has_messages = self.store.exists(&messages).await?;

        if !(has_participants && has_messages) {
            tracing::warn!(
                "Some keys missing for room '{}', proceeding with deletion anyway (participants: {}, messages: {})",
                name,
                has_participants,
                has_messages
            );
        }

        let removed = self.store.delete(vec![room, participants, messages]).await?;
        tracing::info!("Chat room '{}' deleted ({} keys removed)", name, removed);
        Ok(())
    }
}
