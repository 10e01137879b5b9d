use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Flat JSON object exchanged with the gateway.
pub type Payload = Map<String, Value>;

/// Network access to the payment gateway.
///
/// Implementations own transport, session and timeout concerns. A call is a
/// single unit of work: no retries.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Sends `payload` to `endpoint`.
    ///
    /// Fails with `OrderError::Transport` on network errors and
    /// `OrderError::RemoteRejection` when the gateway refuses the request.
    async fn put(&self, endpoint: &str, payload: &Payload) -> Result<Payload>;
}

/// Asymmetric signature over a canonical string, returned as text.
pub trait SignatureEngine: Send + Sync {
    /// Fails with `OrderError::Signing` on malformed key material.
    fn sign(&self, private_key: &[u8], canonical: &str) -> Result<String>;
}

pub type GatewayClientBox = Box<dyn GatewayClient>;
pub type SignatureEngineBox = Box<dyn SignatureEngine>;
