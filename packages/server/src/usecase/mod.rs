//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層の trait（ポート）を通じて Shared Store を操作します。

pub mod connect_participant;
pub mod create_room;
pub mod delete_room;
pub mod disconnect_participant;
pub mod error;
pub mod get_messages;
pub mod get_room;
pub mod join_room;
pub mod leave_room;
pub mod send_message;

pub use connect_participant::{Admission, ConnectParticipantUseCase};
pub use create_room::CreateRoomUseCase;
pub use delete_room::DeleteRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, ErrorKind, UseCaseError};
pub use get_messages::GetMessagesUseCase;
pub use get_room::{GetRoomUseCase, RoomDetail};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;

use crate::domain::{RoomName, RoomRepository};

/// 既存のルームを解決する
///
/// ルーム名として不正な文字列は作成され得ないため、存在しないルームとして扱う。
pub(crate) async fn require_room(
    repository: &dyn RoomRepository,
    room: &str,
) -> Result<RoomName, UseCaseError> {
    let name = RoomName::new(room.to_string())
        .map_err(|_| UseCaseError::RoomNotFound(room.to_string()))?;
    if !repository.room_exists(name.as_str()).await? {
        return Err(UseCaseError::RoomNotFound(room.to_string()));
    }
    Ok(name)
}
