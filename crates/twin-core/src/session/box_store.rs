//! BoxSessionStore -- object-safe dynamic dispatch wrapper for SessionStore.
//!
//! 1. Define an object-safe `SessionStoreDyn` trait with boxed futures
//! 2. Blanket-impl `SessionStoreDyn` for all `T: SessionStore`
//! 3. `BoxSessionStore` wraps `Box<dyn SessionStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use twin_types::chat::{Message, SessionId};
use twin_types::error::StoreError;

use super::store::SessionStore;

/// Object-safe version of [`SessionStore`] with boxed futures.
pub trait SessionStoreDyn: Send + Sync {
    fn store_name(&self) -> &str;

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, StoreError>> + Send + 'a>>;

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;
}

impl<T: SessionStore> SessionStoreDyn for T {
    fn store_name(&self) -> &str {
        SessionStore::name(self)
    }

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, StoreError>> + Send + 'a>> {
        Box::pin(self.load(session_id))
    }

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.save(session_id, messages))
    }
}

/// Type-erased session store, selected once at startup.
///
/// Since `SessionStore` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxSessionStore` lets the application pick the filesystem or
/// object-storage backend from configuration while the rest of the code stays
/// monomorphic over a single store type.
pub struct BoxSessionStore {
    inner: Box<dyn SessionStoreDyn + Send + Sync>,
}

impl BoxSessionStore {
    /// Wrap a concrete `SessionStore` in a type-erased box.
    pub fn new<T: SessionStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl SessionStore for BoxSessionStore {
    fn name(&self) -> &str {
        self.inner.store_name()
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Message>, StoreError> {
        self.inner.load_boxed(session_id).await
    }

    async fn save(&self, session_id: &SessionId, messages: &[Message]) -> Result<(), StoreError> {
        self.inner.save_boxed(session_id, messages).await
    }
}
