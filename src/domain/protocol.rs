//! Versioned constants of the payment-order message.
//!
//! Wire names and the signing order belong to the gateway, not to
//! [`OrderRecord`](super::order::OrderRecord). A protocol revision only touches
//! this file.

macro_rules! order_path {
    ($suffix:literal) => {
        concat!("/ordenPago", $suffix)
    };
}

/// Resource path of payment orders.
pub const ORDER_ENDPOINT: &str = order_path!("");

/// Path used to register a new payment order.
pub const REGISTER_ENDPOINT: &str = order_path!("/registra");

/// Institution code of the operating participant.
pub const OPERATING_INSTITUTION: &str = "90646";

/// High priority.
pub const PRIORITY: u8 = 1;

pub const TEXT_LIMIT: usize = 39;
pub const TRACKING_KEY_LIMIT: usize = 29;
pub const TAX_ID_LIMIT: usize = 18;

pub const DEFAULT_BENEFICIARY_TAX_ID: &str = "ND";
pub const DEFAULT_DELIVERY_METHOD: u32 = 3;
pub const DEFAULT_PAYMENT_TYPE: u32 = 1;

/// Exclusive upper bound of `referenciaNumerica`.
pub const NUMERIC_REFERENCE_LIMIT: u32 = 10_000_000;
/// Lower bound of generated numeric references.
pub const NUMERIC_REFERENCE_FLOOR: u32 = 1_000_000;

pub mod field {
    pub const AMOUNT: &str = "monto";
    pub const PAYMENT_CONCEPT: &str = "conceptoPago";
    pub const BENEFICIARY_ACCOUNT: &str = "cuentaBeneficiario";
    pub const BENEFICIARY_NAME: &str = "nombreBeneficiario";
    pub const BENEFICIARY_ACCOUNT_TYPE: &str = "tipoCuentaBeneficiario";
    pub const BENEFICIARY_TAX_ID: &str = "rfcCurpBeneficiario";
    pub const COUNTERPARTY_INSTITUTION: &str = "institucionContraparte";
    pub const PAYER_ACCOUNT: &str = "cuentaOrdenante";
    pub const PAYER_ACCOUNT_TYPE: &str = "tipoCuentaOrdenante";
    pub const PAYER_NAME: &str = "nombreOrdenante";
    pub const PAYER_TAX_ID: &str = "rfcCurpOrdenante";
    pub const TRACKING_KEY: &str = "claveRastreo";
    pub const NUMERIC_REFERENCE: &str = "referenciaNumerica";
    pub const DELIVERY_METHOD: &str = "medioEntrega";
    pub const PAYMENT_TYPE: &str = "tipoPago";
    pub const TOPOLOGY: &str = "topologia";
    pub const VAT: &str = "iva";
    pub const PRIORITY: &str = "prioridad";
    pub const OPERATING_INSTITUTION: &str = "institucionOperante";
    pub const COMPANY: &str = "empresa";
    pub const SIGNATURE: &str = "firma";
    pub const ID: &str = "id";
}

/// Fields rendered with two decimals in the signing string.
pub const DECIMAL_FIELDS: [&str; 2] = [field::AMOUNT, field::VAT];

/// Signing field order, version 1.
///
/// Several names belong to other message types of the gateway and are never
/// present on a payment order; they contribute an empty string.
pub const ORDER_FIELDNAMES_V1: &[&str] = &[
    "institucionContraparte",
    "empresa",
    "fechaOperacion",
    "folioOrigen",
    "claveRastreo",
    "institucionOperante",
    "monto",
    "tipoPago",
    "tipoCuentaOrdenante",
    "nombreOrdenante",
    "cuentaOrdenante",
    "rfcCurpOrdenante",
    "tipoCuentaBeneficiario",
    "nombreBeneficiario",
    "cuentaBeneficiario",
    "rfcCurpBeneficiario",
    "emailBeneficiario",
    "tipoCuentaBeneficiario2",
    "nombreBeneficiario2",
    "cuentaBeneficiario2",
    "rfcCurpBeneficiario2",
    "conceptoPago",
    "conceptoPago2",
    "claveCatUsuario1",
    "claveCatUsuario2",
    "clavePago",
    "referenciaCobranza",
    "referenciaNumerica",
    "tipoOperacion",
    "topologia",
    "usuario",
    "medioEntrega",
    "prioridad",
    "iva",
];

/// Signing order used by this crate.
pub const ORDER_FIELDNAMES: &[&str] = ORDER_FIELDNAMES_V1;
