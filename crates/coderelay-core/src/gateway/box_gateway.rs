//! BoxModelGateway -- object-safe dynamic dispatch wrapper for ModelGateway.
//!
//! 1. Define an object-safe `ModelGatewayDyn` trait with boxed futures
//! 2. Blanket-impl `ModelGatewayDyn` for all `T: ModelGateway`
//! 3. `BoxModelGateway` wraps `Arc<dyn ModelGatewayDyn>` and delegates
//!
//! The wrapper itself implements `ModelGateway`, so services generic over the
//! trait can be pinned to it and share one backend instance.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use coderelay_types::gateway::{GatewayError, GenerationParams};

use super::provider::ModelGateway;

/// Object-safe version of [`ModelGateway`] with boxed futures.
pub trait ModelGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn invoke_boxed<'a>(
        &'a self,
        model_path: &'a str,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;
}

/// Blanket implementation: any `ModelGateway` automatically implements `ModelGatewayDyn`.
impl<T: ModelGateway> ModelGatewayDyn for T {
    fn name(&self) -> &str {
        ModelGateway::name(self)
    }

    fn invoke_boxed<'a>(
        &'a self,
        model_path: &'a str,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        Box::pin(self.invoke(model_path, prompt, params))
    }
}

/// Type-erased, cloneable gateway handle.
///
/// Clones share the same underlying backend (and its HTTP connection pool).
#[derive(Clone)]
pub struct BoxModelGateway {
    inner: Arc<dyn ModelGatewayDyn + Send + Sync>,
}

impl BoxModelGateway {
    /// Wrap a concrete `ModelGateway` in a type-erased handle.
    pub fn new<T: ModelGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Arc::new(gateway),
        }
    }
}

impl ModelGateway for BoxModelGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(
        &self,
        model_path: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        self.inner.invoke_boxed(model_path, prompt, params).await
    }
}
