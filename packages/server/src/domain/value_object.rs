//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use hiroba_shared::time::get_current_timestamp;

use super::error::ValueObjectError;

/// Minimum length of a room name
pub const ROOM_NAME_MIN_LEN: usize = 3;

/// Maximum length of a room name
pub const ROOM_NAME_MAX_LEN: usize = 50;

/// Maximum length of a participant name
pub const PARTICIPANT_NAME_MAX_LEN: usize = 100;

/// Maximum length of a message body
pub const MESSAGE_CONTENT_MAX_LEN: usize = 10000;

/// Room name value object.
///
/// A room is identified by its name: 3 to 50 characters of `[a-zA-Z0-9_-]`.
/// Surrounding whitespace is trimmed before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Arguments
    ///
    /// * `name` - The room name string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = trimmed.chars().count();
        if !(ROOM_NAME_MIN_LEN..=ROOM_NAME_MAX_LEN).contains(&len) {
            return Err(ValueObjectError::RoomNameLength {
                min: ROOM_NAME_MIN_LEN,
                max: ROOM_NAME_MAX_LEN,
                actual: len,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValueObjectError::RoomNameInvalidCharacters(
                trimmed.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomName> for String {
    fn from(value: RoomName) -> Self {
        value.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant name value object.
///
/// Participants are plain names; the same name may join several rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    /// Create a new ParticipantName. Surrounding whitespace is trimmed.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::ParticipantNameEmpty);
        }
        let len = trimmed.chars().count();
        if len > PARTICIPANT_NAME_MAX_LEN {
            return Err(ValueObjectError::ParticipantNameTooLong {
                max: PARTICIPANT_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantName> for String {
    fn from(value: ParticipantName) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the body of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// Blank content is rejected. The body itself is stored untrimmed.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.chars().count();
        if len > MESSAGE_CONTENT_MAX_LEN {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current time.
    pub fn now() -> Self {
        Self(get_current_timestamp())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name_new_success() {
        // テスト項目: 有効なルーム名を作成できる
        // given (前提条件):
        let name = "lobby".to_string();

        // when (操作):
        let result = RoomName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "lobby");
    }

    #[test]
    fn test_room_name_is_trimmed() {
        // テスト項目: ルーム名の前後の空白は取り除かれる
        // when (操作):
        let result = RoomName::new("  dev_team-1  ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "dev_team-1");
    }

    #[test]
    fn test_room_name_empty_fails() {
        // テスト項目: 空のルーム名は作成できない
        // when (操作):
        let result = RoomName::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RoomNameEmpty);
    }

    #[test]
    fn test_room_name_length_bounds() {
        // テスト項目: 3 文字未満・50 文字超のルーム名は作成できない
        // given (前提条件):
        let too_short = "ab".to_string();
        let too_long = "a".repeat(51);

        // when (操作):
        let short_result = RoomName::new(too_short);
        let long_result = RoomName::new(too_long);

        // then (期待する結果):
        assert_eq!(
            short_result.unwrap_err(),
            ValueObjectError::RoomNameLength {
                min: 3,
                max: 50,
                actual: 2
            }
        );
        assert_eq!(
            long_result.unwrap_err(),
            ValueObjectError::RoomNameLength {
                min: 3,
                max: 50,
                actual: 51
            }
        );
        assert!(RoomName::new("abc".to_string()).is_ok());
        assert!(RoomName::new("a".repeat(50)).is_ok());
    }

    #[test]
    fn test_room_name_invalid_characters_fails() {
        // テスト項目: 英数字・アンダースコア・ハイフン以外を含むルーム名は作成できない
        // when (操作):
        let result = RoomName::new("my room".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomNameInvalidCharacters("my room".to_string())
        );
        assert!(RoomName::new("room:1".to_string()).is_err());
        assert!(RoomName::new("ルーム名".to_string()).is_err());
    }

    #[test]
    fn test_participant_name_new_success() {
        // テスト項目: 有効な参加者名を作成でき、前後の空白は取り除かれる
        // when (操作):
        let result = ParticipantName::new(" alice ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_participant_name_blank_fails() {
        // テスト項目: 空白のみの参加者名は作成できない
        // when (操作):
        let result = ParticipantName::new(" \t ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ParticipantNameEmpty);
    }

    #[test]
    fn test_participant_name_too_long_fails() {
        // テスト項目: 101 文字以上の参加者名は作成できない
        // when (操作):
        let result = ParticipantName::new("a".repeat(101));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ParticipantNameTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_message_content_new_success() {
        // テスト項目: 有効なメッセージ内容を作成できる
        // when (操作):
        let result = MessageContent::new("Hello, world!".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "Hello, world!");
    }

    #[test]
    fn test_message_content_blank_fails() {
        // テスト項目: 空白のみのメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new("  ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageContentEmpty);
    }

    #[test]
    fn test_message_content_too_long_fails() {
        // テスト項目: 10001 文字以上のメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new("a".repeat(10001));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_deserialize_rejects_invalid_room_name() {
        // テスト項目: デシリアライズ時にもルーム名の検証が行われる
        // when (操作):
        let ok: Result<RoomName, _> = serde_json::from_str("\"lobby\"");
        let ng: Result<RoomName, _> = serde_json::from_str("\"x\"");

        // then (期待する結果):
        assert!(ok.is_ok());
        assert!(ng.is_err());
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts1.value(), 1000);
    }
}
