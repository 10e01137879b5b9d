use crate::domain::ports::{GatewayClient, Payload};
use crate::domain::protocol::field;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct GatewayState {
    next_id: u64,
    submitted: Vec<(String, Payload)>,
}

/// A gateway stand-in that keeps accepted payloads in memory.
///
/// Ids are assigned sequentially. Clones share state, so a test can hand one
/// clone to the registrar and inspect the other.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
    rejection: Option<(u16, String)>,
}

impl InMemoryGateway {
    /// Accepts every request, assigning ids from `first_id` upward.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(GatewayState {
                next_id: first_id,
                submitted: Vec::new(),
            })),
            rejection: None,
        }
    }

    /// Rejects every request with the given status and message.
    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        Self {
            state: Arc::default(),
            rejection: Some((status, message.into())),
        }
    }

    /// Accepted `(endpoint, payload)` pairs, oldest first.
    pub async fn submitted(&self) -> Vec<(String, Payload)> {
        self.state.read().await.submitted.clone()
    }
}

#[async_trait]
impl GatewayClient for InMemoryGateway {
    async fn put(&self, endpoint: &str, payload: &Payload) -> Result<Payload> {
        if let Some((status, message)) = &self.rejection {
            return Err(OrderError::RemoteRejection {
                endpoint: endpoint.to_string(),
                status: *status,
                message: message.clone(),
            });
        }

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;
        state
            .submitted
            .push((endpoint.to_string(), payload.clone()));

        let mut response = Payload::new();
        response.insert(field::ID.into(), id.into());
        Ok(response)
    }
}
