//! Repository パターンの実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装を提供します。
//! いずれも `SharedStore` の上に構築され、ストア固有のエラーは
//! `RepositoryError::StoreUnavailable` に変換されます。
//! UseCase 層は trait（ドメイン層）に依存し、この実装に直接依存しません（依存性の逆転）。

pub mod message;
pub mod room;

pub use message::StoreMessageRepository;
pub use room::StoreRoomRepository;

use crate::{domain::RepositoryError, infrastructure::store::StoreError};

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        RepositoryError::StoreUnavailable(err.to_string())
    }
}
