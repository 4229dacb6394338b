//! Dialect adapter for the capability gateway.
//!
//! Backends exist in two call conventions: callback-style (every operation
//! delivers its result through a one-shot callback) and promise-style
//! (operations return futures). [`GatewayAdapter`] wraps either behind the
//! async-only [`CapabilityGateway`] interface; the two dialects are
//! indistinguishable to the core.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::oneshot;

use crate::gateway::{CapabilityGateway, RuntimeMessage, RuntimeResponse};
use crate::types::errors::GatewayError;

/// One-shot completion callback used by the callback dialect.
pub type Callback<T> = Box<dyn FnOnce(Result<T, GatewayError>) + Send>;

/// Callback-style capability backend.
pub trait CallbackCapabilities: Send + Sync {
    fn storage_get(&self, keys: Vec<String>, done: Callback<Map<String, Value>>);
    fn storage_set(&self, items: Map<String, Value>, done: Callback<()>);
    fn storage_remove(&self, keys: Vec<String>, done: Callback<()>);
    fn send_runtime_message(&self, message: RuntimeMessage, done: Callback<RuntimeResponse>);
    fn capture_visible_viewport(&self, done: Callback<String>);
}

/// Promise-style capability backend.
#[async_trait]
pub trait PromiseCapabilities: Send + Sync {
    async fn storage_get(&self, keys: Vec<String>) -> Result<Map<String, Value>, GatewayError>;
    async fn storage_set(&self, items: Map<String, Value>) -> Result<(), GatewayError>;
    async fn storage_remove(&self, keys: Vec<String>) -> Result<(), GatewayError>;
    async fn send_runtime_message(
        &self,
        message: RuntimeMessage,
    ) -> Result<RuntimeResponse, GatewayError>;
    async fn capture_visible_viewport(&self) -> Result<String, GatewayError>;
}

enum DialectBackend {
    Callback(Arc<dyn CallbackCapabilities>),
    Promise(Arc<dyn PromiseCapabilities>),
}

/// Adapter exposing either backend dialect as a [`CapabilityGateway`].
pub struct GatewayAdapter {
    backend: DialectBackend,
}

impl GatewayAdapter {
    /// Wraps a callback-style backend.
    pub fn from_callback(backend: Arc<dyn CallbackCapabilities>) -> Self {
        Self {
            backend: DialectBackend::Callback(backend),
        }
    }

    /// Wraps a promise-style backend.
    pub fn from_promise(backend: Arc<dyn PromiseCapabilities>) -> Self {
        Self {
            backend: DialectBackend::Promise(backend),
        }
    }
}

/// Bridges a callback invocation into a future. A backend that drops the
/// callback without calling it resolves to a messaging error instead of
/// hanging forever.
async fn await_callback<T, F>(invoke: F) -> Result<T, GatewayError>
where
    T: Send + 'static,
    F: FnOnce(Callback<T>),
{
    let (tx, rx) = oneshot::channel();
    invoke(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await.unwrap_or_else(|_| {
        Err(GatewayError::Messaging(
            "backend dropped the callback without responding".to_string(),
        ))
    })
}

#[async_trait]
impl CapabilityGateway for GatewayAdapter {
    async fn storage_get(&self, keys: &[&str]) -> Result<Map<String, Value>, GatewayError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        match &self.backend {
            DialectBackend::Callback(cb) => {
                await_callback(|done| cb.storage_get(keys, done)).await
            }
            DialectBackend::Promise(p) => p.storage_get(keys).await,
        }
    }

    async fn storage_set(&self, items: Map<String, Value>) -> Result<(), GatewayError> {
        match &self.backend {
            DialectBackend::Callback(cb) => {
                await_callback(|done| cb.storage_set(items, done)).await
            }
            DialectBackend::Promise(p) => p.storage_set(items).await,
        }
    }

    async fn storage_remove(&self, keys: &[&str]) -> Result<(), GatewayError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        match &self.backend {
            DialectBackend::Callback(cb) => {
                await_callback(|done| cb.storage_remove(keys, done)).await
            }
            DialectBackend::Promise(p) => p.storage_remove(keys).await,
        }
    }

    async fn send_runtime_message(
        &self,
        message: RuntimeMessage,
    ) -> Result<RuntimeResponse, GatewayError> {
        match &self.backend {
            DialectBackend::Callback(cb) => {
                await_callback(|done| cb.send_runtime_message(message, done)).await
            }
            DialectBackend::Promise(p) => p.send_runtime_message(message).await,
        }
    }

    async fn capture_visible_viewport(&self) -> Result<String, GatewayError> {
        match &self.backend {
            DialectBackend::Callback(cb) => {
                await_callback(|done| cb.capture_visible_viewport(done)).await
            }
            DialectBackend::Promise(p) => p.capture_visible_viewport().await,
        }
    }
}
