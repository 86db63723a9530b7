//! UseCase: ルーム作成処理

use std::sync::Arc;

use crate::domain::{RoomMetadata, RoomName, RoomRepository};

use super::error::UseCaseError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム作成を実行
    ///
    /// ルーム名は前後の空白を除いて検証される（3〜50 文字、英数字・`_`・`-` のみ）。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomMetadata)` - 作成されたルームのメタデータ
    /// * `Err(UseCaseError::InvalidInput)` - ルーム名が不正
    /// * `Err(UseCaseError::RoomAlreadyExists)` - 同名のルームが既に存在する
    pub async fn execute(&self, room_name: String) -> Result<RoomMetadata, UseCaseError> {
        let name = RoomName::new(room_name)?;
        Ok(self.repository.create_room(&name).await?)
    }
}
