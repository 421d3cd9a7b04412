//! Domain factories for creating domain entities and value objects.

use super::{SessionId, error::ValueObjectError};

/// Factory for generating SessionId instances.
///
/// Separates id generation from the validation logic in SessionId.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId from a random UUID v4 (simple form, 32 hex chars).
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<SessionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        SessionId::new(uuid.simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_factory_generate() {
        // テスト項目: SessionIdFactory::generate() でハイフンなしの UUID 形式の ID を生成できる
        // when (操作):
        let result = SessionIdFactory::generate();

        // then (期待する結果):
        assert!(result.is_ok());
        let id = result.unwrap();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_id_factory_generate_uniqueness() {
        // テスト項目: SessionIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let id1 = SessionIdFactory::generate().unwrap();
        let id2 = SessionIdFactory::generate().unwrap();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }
}
