mod common;

use speiorden::application::registration::OrderRegistrar;
use speiorden::domain::ports::{GatewayClientBox, SignatureEngineBox};
use speiorden::infrastructure::ed25519::Ed25519Signer;
use speiorden::infrastructure::in_memory::InMemoryGateway;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let gateway = InMemoryGateway::starting_at(1);
    let gateway_box: GatewayClientBox = Box::new(gateway.clone());
    let signer_box: SignatureEngineBox = Box::new(Ed25519Signer);
    let registrar = Arc::new(OrderRegistrar::new(
        gateway_box,
        signer_box,
        common::credentials(),
    ));

    // Verify Send + Sync by registering from several tasks
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registrar = Arc::clone(&registrar);
            tokio::spawn(async move { registrar.register(common::order_fields()).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().assigned_id().unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(gateway.submitted().await.len(), 4);
}
