//! Key layout in the shared store, namespaced by room name.
//!
//! ```text
//! chatroom:{room}                metadata hash (roomName, createdAt, participantCount)
//! chatroom:{room}:participants   membership set
//! chatroom:{room}:messages       message log list
//! chatroom:{room}:channel        pub/sub channel
//! ```

const KEY_PREFIX: &str = "chatroom:";
const PARTICIPANTS_SUFFIX: &str = ":participants";
const MESSAGES_SUFFIX: &str = ":messages";
const CHANNEL_SUFFIX: &str = ":channel";

/// Pattern matching the channel of every room
pub const ROOM_CHANNEL_PATTERN: &str = "chatroom:*:channel";

/// Metadata hash fields
pub const FIELD_ROOM_NAME: &str = "roomName";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_PARTICIPANT_COUNT: &str = "participantCount";

pub fn room_key(room: &str) -> String {
    format!("{KEY_PREFIX}{room}")
}

pub fn participants_key(room: &str) -> String {
    format!("{KEY_PREFIX}{room}{PARTICIPANTS_SUFFIX}")
}

pub fn messages_key(room: &str) -> String {
    format!("{KEY_PREFIX}{room}{MESSAGES_SUFFIX}")
}

pub fn channel_key(room: &str) -> String {
    format!("{KEY_PREFIX}{room}{CHANNEL_SUFFIX}")
}

/// Extract the room name from a channel identifier (`chatroom:{room}:channel`).
pub fn room_from_channel(channel: &str) -> Option<&str> {
    channel
        .strip_prefix(KEY_PREFIX)?
        .strip_suffix(CHANNEL_SUFFIX)
        .filter(|room| !room.is_empty())
}
