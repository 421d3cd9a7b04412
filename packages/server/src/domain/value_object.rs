//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Namespace path value object.
///
/// A namespace is addressed by an absolute, path-like name such as `/` or
/// `/admin`. The `,` character is reserved by the packet encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacePath(String);

impl NamespacePath {
    /// Create a new NamespacePath.
    ///
    /// # Arguments
    ///
    /// * `path` - The namespace path, e.g. `/admin`
    ///
    /// # Returns
    ///
    /// A Result containing the NamespacePath or an error if validation fails
    pub fn new(path: String) -> Result<Self, ValueObjectError> {
        if path.is_empty() {
            return Err(ValueObjectError::NamespaceEmpty);
        }
        if !path.starts_with('/') {
            return Err(ValueObjectError::NamespaceNotAbsolute(path));
        }
        if path.contains(',') {
            return Err(ValueObjectError::NamespaceInvalidChar(path));
        }
        Ok(Self(path))
    }

    /// Create a NamespacePath from a literal known at compile time.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not absolute or contains `,`.
    pub fn from_static(path: &'static str) -> Self {
        assert!(
            path.starts_with('/') && !path.contains(','),
            "invalid static namespace path: {path:?}"
        );
        Self(path.to_string())
    }

    /// The default namespace `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Whether this is the default namespace.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NamespacePath {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NamespacePath {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event name value object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
    /// Create a new EventName.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::EventNameEmpty);
        }
        Ok(Self(name))
    }

    /// Create an EventName from a literal known at compile time.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn from_static(name: &'static str) -> Self {
        assert!(!name.is_empty(), "invalid static event name: {name:?}");
        Self(name.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EventName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session identifier value object.
///
/// Identifies one namespace connection. Engine connections use the same
/// type for their own id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new SessionId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::SessionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object (Unix milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_path_new_success() {
        // テスト項目: 有効な名前空間パスを作成できる
        // when (操作):
        let result = NamespacePath::new("/admin".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        let nsp = result.unwrap();
        assert_eq!(nsp.as_str(), "/admin");
        assert!(!nsp.is_root());
    }

    #[test]
    fn test_namespace_path_root() {
        // テスト項目: デフォルト名前空間は "/" である
        // when (操作):
        let nsp = NamespacePath::root();

        // then (期待する結果):
        assert!(nsp.is_root());
        assert_eq!(nsp, NamespacePath::try_from("/").unwrap());
    }

    #[test]
    fn test_namespace_path_empty_fails() {
        // テスト項目: 空の名前空間パスは作成できない
        // when (操作):
        let result = NamespacePath::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::NamespaceEmpty);
    }

    #[test]
    fn test_namespace_path_relative_fails() {
        // テスト項目: "/" で始まらないパスは作成できない
        // when (操作):
        let result = NamespacePath::new("admin".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::NamespaceNotAbsolute("admin".to_string())
        );
    }

    #[test]
    fn test_namespace_path_comma_fails() {
        // テスト項目: "," を含むパスはパケットの区切り文字と衝突するため作成できない
        // when (操作):
        let result = NamespacePath::new("/a,b".to_string());

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ValueObjectError::NamespaceInvalidChar(_))
        ));
    }

    #[test]
    fn test_namespace_path_has_no_length_limit() {
        // テスト項目: 長い名前空間パスも作成できる（未登録かどうかは上位層で判定する）
        // given (前提条件):
        let path = format!("/{}", "a".repeat(100));

        // when (操作):
        let result = NamespacePath::new(path.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), path);
    }

    #[test]
    fn test_namespace_path_from_static() {
        // テスト項目: リテラルから名前空間パスを作成できる
        // when (操作):
        let nsp = NamespacePath::from_static("/admin");

        // then (期待する結果):
        assert_eq!(nsp, NamespacePath::try_from("/admin").unwrap());
    }

    #[test]
    #[should_panic(expected = "invalid static namespace path")]
    fn test_namespace_path_from_static_rejects_relative_path() {
        // テスト項目: "/" で始まらないリテラルはパニックする
        NamespacePath::from_static("admin");
    }

    #[test]
    fn test_event_name_validation() {
        // テスト項目: イベント名の検証
        // then (期待する結果):
        assert_eq!(EventName::try_from("ping").unwrap().as_str(), "ping");
        assert_eq!(
            EventName::try_from("").unwrap_err(),
            ValueObjectError::EventNameEmpty
        );
        assert_eq!(
            EventName::new("e".repeat(101)).unwrap().as_str().len(),
            101
        );
    }

    #[test]
    fn test_session_id_empty_fails() {
        // テスト項目: 空のセッション ID は作成できない
        // when (操作):
        let result = SessionId::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::SessionIdEmpty);
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
