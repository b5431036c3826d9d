//! Session store implementations.
//!
//! Both backends share the on-disk/on-wire format defined here: the log is a
//! pretty-printed (2-space indented) JSON array of `{role, content, timestamp}`
//! objects, stored under `SessionId::storage_key()`.

pub mod local;
pub mod s3;

use twin_core::session::box_store::BoxSessionStore;
use twin_types::chat::Message;
use twin_types::config::StorageBackend;
use twin_types::error::StoreError;

pub use local::LocalSessionStore;
pub use s3::S3SessionStore;

/// Content type of stored conversation logs.
pub const LOG_CONTENT_TYPE: &str = "application/json";

/// Encode a conversation log in the persisted format.
pub fn encode_log(messages: &[Message]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(messages).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Decode a persisted conversation log.
pub fn decode_log(bytes: &[u8]) -> Result<Vec<Message>, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Build the one session store this process will use.
///
/// The S3 client is created here, once, and reused for every request.
pub async fn connect_session_store(backend: &StorageBackend) -> BoxSessionStore {
    match backend {
        StorageBackend::Local { dir } => BoxSessionStore::new(LocalSessionStore::new(dir.clone())),
        StorageBackend::S3 { bucket } => {
            let sdk_config = crate::aws::load_sdk_config(None).await;
            BoxSessionStore::new(S3SessionStore::new(
                aws_sdk_s3::Client::new(&sdk_config),
                bucket.clone(),
            ))
        }
    }
}
