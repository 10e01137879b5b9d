use crate::domain::canonical::canonicalize;
use crate::domain::order::{OrderFields, OrderRecord};
use crate::domain::ports::{GatewayClientBox, Payload, SignatureEngineBox};
use crate::domain::protocol::{self, field};
use crate::error::{OrderError, Result};

/// Identity the orders are registered under.
#[derive(Clone)]
pub struct Credentials {
    /// Company name sent as `empresa`.
    pub company: String,
    /// Key material handed to the signature engine.
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("company", &self.company)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Registers payment orders with the gateway.
///
/// Validation, payload construction, signing, submission and id binding
/// happen in that order. A record consumed by a failed submission is gone;
/// the caller builds a new one to try again.
pub struct OrderRegistrar {
    gateway: GatewayClientBox,
    signer: SignatureEngineBox,
    credentials: Credentials,
}

impl OrderRegistrar {
    /// Creates a new `OrderRegistrar`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - Client used to reach the payment gateway.
    /// * `signer` - Signature primitive applied to the canonical string.
    /// * `credentials` - Company name and private key.
    pub fn new(
        gateway: GatewayClientBox,
        signer: SignatureEngineBox,
        credentials: Credentials,
    ) -> Self {
        Self {
            gateway,
            signer,
            credentials,
        }
    }

    /// Validates `fields` and submits the resulting order.
    pub async fn register(&self, fields: OrderFields) -> Result<OrderRecord> {
        let record = OrderRecord::try_from(fields)?;
        self.submit(record).await
    }

    /// Signature over the record's current field values.
    pub fn signature(&self, record: &OrderRecord) -> Result<String> {
        let payload = record.to_payload(&self.credentials.company);
        self.sign_payload(&payload)
    }

    /// Wire payload with a freshly computed `firma`.
    pub fn prepare(&self, record: &OrderRecord) -> Result<Payload> {
        let mut payload = record.to_payload(&self.credentials.company);
        let signature = self.sign_payload(&payload)?;
        payload.insert(field::SIGNATURE.into(), signature.into());
        Ok(payload)
    }

    /// Submits `record` and binds the id the gateway assigns.
    pub async fn submit(&self, mut record: OrderRecord) -> Result<OrderRecord> {
        if let Some(id) = record.assigned_id() {
            return Err(OrderError::AlreadySubmitted(id));
        }

        let payload = self.prepare(&record)?;
        tracing::info!(
            tracking_key = record.tracking_key(),
            numeric_reference = record.numeric_reference(),
            "registering payment order"
        );

        let response = match self
            .gateway
            .put(protocol::REGISTER_ENDPOINT, &payload)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(tracking_key = record.tracking_key(), error = %e, "registration failed");
                return Err(e);
            }
        };

        let id = response
            .get(field::ID)
            .and_then(|id| id.as_u64())
            .ok_or_else(|| {
                OrderError::MalformedResponse(format!(
                    "expected an integer id, got {}",
                    serde_json::Value::Object(response.clone())
                ))
            })?;

        record.bind_id(id)?;
        tracing::info!(tracking_key = record.tracking_key(), id, "payment order registered");
        Ok(record)
    }

    fn sign_payload(&self, payload: &Payload) -> Result<String> {
        let canonical = canonicalize(payload, protocol::ORDER_FIELDNAMES);
        tracing::debug!(length = canonical.len(), "computed canonical string");
        self.signer.sign(&self.credentials.private_key, &canonical)
    }
}
