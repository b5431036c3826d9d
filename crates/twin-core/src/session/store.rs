//! SessionStore trait definition.
//!
//! One conversation log per session, always read and written whole.

use twin_types::chat::{Message, SessionId};
use twin_types::error::StoreError;

/// Durable storage of conversation logs keyed by session id.
///
/// Implementations live in twin-infra (`LocalSessionStore`, `S3SessionStore`)
/// and must be interchangeable: same key derivation, same JSON encoding, same
/// "missing log loads as empty" behavior.
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// Short backend name for logs (e.g. "local", "s3").
    fn name(&self) -> &str;

    /// Load the full log for a session, oldest message first.
    ///
    /// A session that has never been saved yields an empty vector, not an error.
    fn load(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Replace the full log for a session.
    ///
    /// Readers must never observe a partially written log. The storage
    /// location is created if it does not exist yet.
    fn save(
        &self,
        session_id: &SessionId,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
