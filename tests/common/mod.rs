#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use speiorden::application::registration::Credentials;
use speiorden::domain::order::OrderFields;

pub const COMPANY: &str = "TAMIZI";

/// Base64 seed of the key used across tests.
pub fn test_key() -> String {
    BASE64.encode([42u8; 32])
}

pub fn credentials() -> Credentials {
    Credentials {
        company: COMPANY.to_string(),
        private_key: test_key().into_bytes(),
    }
}

pub fn order_json() -> Value {
    json!({
        "monto": 1.2,
        "conceptoPago": "Prueba de pagó",
        "cuentaBeneficiario": "072691004495711499",
        "nombreBeneficiario": "Ricardo Sánchez",
        "institucionContraparte": "40072",
        "cuentaOrdenante": "646180157000000004",
        "nombreOrdenante": "TAMIZI",
        "rfcCurpBeneficiario": "ND",
        "claveRastreo": "CUENCA1234",
        "referenciaNumerica": 5273144,
    })
}

pub fn order_fields() -> OrderFields {
    serde_json::from_value(order_json()).expect("valid order json")
}
