use super::account::{AccountType, BeneficiaryAccount, Clabe};
use super::bank::BankCodeRegistry;
use super::canonical::canonicalize;
use super::ports::Payload;
use super::protocol::{self, field};
use super::text;
use crate::error::{OrderError, ValidationError};
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Positive currency amount, kept exactly as the caller supplied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    value: Decimal,
    supplied: f64,
}

impl Amount {
    pub fn new(supplied: f64) -> Result<Self, ValidationError> {
        if !supplied.is_finite() || supplied <= 0.0 {
            return Err(ValidationError::new(field::AMOUNT, "must be positive"));
        }
        let value = Decimal::from_str(&supplied.to_string()).map_err(|_| {
            ValidationError::new(
                field::AMOUNT,
                format!("{supplied} exceeds the largest supported amount"),
            )
        })?;
        if value.is_zero() {
            return Err(ValidationError::new(
                field::AMOUNT,
                format!("{supplied} is below the smallest supported amount"),
            ));
        }
        Ok(Self { value, supplied })
    }

    /// Accepts only floating-point numerals; `100` is rejected while `100.0`
    /// is accepted.
    pub fn from_number(number: &Number) -> Result<Self, ValidationError> {
        match number.as_f64() {
            Some(supplied) if number.is_f64() => Self::new(supplied),
            _ => Err(ValidationError::new(
                field::AMOUNT,
                "must be a floating-point numeral",
            )),
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn as_f64(&self) -> f64 {
        self.supplied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    #[default]
    T,
    V,
}

impl Topology {
    pub fn as_str(self) -> &'static str {
        match self {
            Topology::T => "T",
            Topology::V => "V",
        }
    }
}

impl FromStr for Topology {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T" => Ok(Topology::T),
            "V" => Ok(Topology::V),
            other => Err(ValidationError::new(
                field::TOPOLOGY,
                format!("{other} is not a known topology"),
            )),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unvalidated order input keyed by wire names.
///
/// Numeric fields are kept as JSON numbers so that an integer amount can be
/// told apart from a float one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderFields {
    #[serde(rename = "monto", default)]
    pub amount: Option<Number>,
    #[serde(rename = "conceptoPago", default)]
    pub payment_concept: Option<String>,
    #[serde(rename = "cuentaBeneficiario", default)]
    pub beneficiary_account: Option<String>,
    #[serde(rename = "nombreBeneficiario", default)]
    pub beneficiary_name: Option<String>,
    #[serde(rename = "institucionContraparte", default)]
    pub counterparty_institution: Option<String>,
    #[serde(rename = "cuentaOrdenante", default)]
    pub payer_account: Option<String>,
    #[serde(rename = "nombreOrdenante", default)]
    pub payer_name: Option<String>,
    #[serde(rename = "claveRastreo", default)]
    pub tracking_key: Option<String>,
    #[serde(rename = "referenciaNumerica", default)]
    pub numeric_reference: Option<Number>,
    #[serde(rename = "rfcCurpBeneficiario", default)]
    pub beneficiary_tax_id: Option<String>,
    #[serde(rename = "rfcCurpOrdenante", default)]
    pub payer_tax_id: Option<String>,
    #[serde(rename = "medioEntrega", default)]
    pub delivery_method: Option<Number>,
    #[serde(rename = "tipoPago", default)]
    pub payment_type: Option<Number>,
    #[serde(rename = "topologia", default)]
    pub topology: Option<String>,
    #[serde(rename = "iva", default)]
    pub vat: Option<Number>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Constructed,
    Submitted(u64),
}

/// A validated, normalized payment order.
///
/// Built once from [`OrderFields`]; the only later change is binding the id
/// the gateway assigns on registration.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    amount: Amount,
    payment_concept: String,
    beneficiary_account: BeneficiaryAccount,
    beneficiary_name: String,
    counterparty_institution: String,
    payer_account: Clabe,
    payer_name: Option<String>,
    tracking_key: String,
    numeric_reference: u32,
    beneficiary_tax_id: String,
    payer_tax_id: Option<String>,
    delivery_method: u32,
    payment_type: u32,
    topology: Topology,
    vat: Option<f64>,
    assigned_id: Option<u64>,
}

impl OrderRecord {
    /// Validates against the process-wide bank registry.
    pub fn new(fields: OrderFields) -> Result<Self, ValidationError> {
        Self::with_registry(fields, BankCodeRegistry::global())
    }

    pub fn with_registry(
        fields: OrderFields,
        registry: &BankCodeRegistry,
    ) -> Result<Self, ValidationError> {
        let amount = Amount::from_number(&required(fields.amount, field::AMOUNT)?)?;
        let payment_concept = text::to_ascii(
            &required(fields.payment_concept, field::PAYMENT_CONCEPT)?,
            protocol::TEXT_LIMIT,
        );
        let beneficiary_account = BeneficiaryAccount::parse(&required(
            fields.beneficiary_account,
            field::BENEFICIARY_ACCOUNT,
        )?)?;
        let beneficiary_name = text::to_ascii(
            &required(fields.beneficiary_name, field::BENEFICIARY_NAME)?,
            protocol::TEXT_LIMIT,
        );
        let counterparty_institution =
            required(fields.counterparty_institution, field::COUNTERPARTY_INSTITUTION)?;
        check_institution_shape(&counterparty_institution)?;
        let payer_account = required(fields.payer_account, field::PAYER_ACCOUNT)?;
        Clabe::check_shape(&payer_account, field::PAYER_ACCOUNT)?;
        let payer_name = fields
            .payer_name
            .map(|name| text::to_ascii(&name, protocol::TEXT_LIMIT));

        let tracking_key = match fields.tracking_key {
            Some(key) => text::truncate(&key, protocol::TRACKING_KEY_LIMIT),
            None => format!("CR{}", Utc::now().timestamp()),
        };
        let numeric_reference = match fields.numeric_reference {
            Some(reference) => parse_numeric_reference(&reference)?,
            None => rand::thread_rng()
                .gen_range(protocol::NUMERIC_REFERENCE_FLOOR..protocol::NUMERIC_REFERENCE_LIMIT),
        };

        let beneficiary_tax_id = parse_tax_id(
            fields
                .beneficiary_tax_id
                .unwrap_or_else(|| protocol::DEFAULT_BENEFICIARY_TAX_ID.to_string()),
            field::BENEFICIARY_TAX_ID,
        )?;
        let payer_tax_id = fields
            .payer_tax_id
            .map(|id| parse_tax_id(id, field::PAYER_TAX_ID))
            .transpose()?;
        let delivery_method = fields
            .delivery_method
            .map(|n| parse_unsigned(&n, field::DELIVERY_METHOD))
            .transpose()?
            .unwrap_or(protocol::DEFAULT_DELIVERY_METHOD);
        let payment_type = fields
            .payment_type
            .map(|n| parse_unsigned(&n, field::PAYMENT_TYPE))
            .transpose()?
            .unwrap_or(protocol::DEFAULT_PAYMENT_TYPE);
        let topology = fields
            .topology
            .map(|t| t.parse::<Topology>())
            .transpose()?
            .unwrap_or_default();
        let vat = fields.vat.map(|n| parse_vat(&n)).transpose()?;

        // Registry lookups run only once every field is well formed.
        if !registry.contains(&counterparty_institution) {
            return Err(ValidationError::new(
                field::COUNTERPARTY_INSTITUTION,
                format!("{counterparty_institution} does not correspond to a bank"),
            ));
        }
        let payer_account = Clabe::parse(&payer_account, registry, field::PAYER_ACCOUNT)?;

        let record = Self {
            amount,
            payment_concept,
            beneficiary_account,
            beneficiary_name,
            counterparty_institution,
            payer_account,
            payer_name,
            tracking_key,
            numeric_reference,
            beneficiary_tax_id,
            payer_tax_id,
            delivery_method,
            payment_type,
            topology,
            vat,
            assigned_id: None,
        };
        tracing::debug!(
            tracking_key = %record.tracking_key,
            numeric_reference = record.numeric_reference,
            "order validated"
        );
        Ok(record)
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn payment_concept(&self) -> &str {
        &self.payment_concept
    }

    pub fn beneficiary_account(&self) -> &BeneficiaryAccount {
        &self.beneficiary_account
    }

    /// Derived on every call, never stored.
    pub fn beneficiary_account_type(&self) -> AccountType {
        self.beneficiary_account.account_type()
    }

    pub fn beneficiary_name(&self) -> &str {
        &self.beneficiary_name
    }

    pub fn counterparty_institution(&self) -> &str {
        &self.counterparty_institution
    }

    pub fn payer_account(&self) -> &Clabe {
        &self.payer_account
    }

    pub fn payer_name(&self) -> Option<&str> {
        self.payer_name.as_deref()
    }

    pub fn tracking_key(&self) -> &str {
        &self.tracking_key
    }

    pub fn numeric_reference(&self) -> u32 {
        self.numeric_reference
    }

    pub fn beneficiary_tax_id(&self) -> &str {
        &self.beneficiary_tax_id
    }

    pub fn payer_tax_id(&self) -> Option<&str> {
        self.payer_tax_id.as_deref()
    }

    pub fn delivery_method(&self) -> u32 {
        self.delivery_method
    }

    pub fn payment_type(&self) -> u32 {
        self.payment_type
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vat(&self) -> Option<f64> {
        self.vat
    }

    pub fn assigned_id(&self) -> Option<u64> {
        self.assigned_id
    }

    pub fn status(&self) -> OrderStatus {
        match self.assigned_id {
            Some(id) => OrderStatus::Submitted(id),
            None => OrderStatus::Constructed,
        }
    }

    /// Binds the gateway id. Succeeds at most once per record.
    pub(crate) fn bind_id(&mut self, id: u64) -> Result<(), OrderError> {
        if let Some(existing) = self.assigned_id {
            return Err(OrderError::AlreadySubmitted(existing));
        }
        self.assigned_id = Some(id);
        Ok(())
    }

    /// Wire payload without the signature.
    ///
    /// The beneficiary account type is derived here and only here.
    pub fn to_payload(&self, company: &str) -> Payload {
        let mut payload = Payload::new();
        payload.insert(field::AMOUNT.into(), float(self.amount.as_f64()));
        payload.insert(field::PAYMENT_CONCEPT.into(), self.payment_concept.clone().into());
        payload.insert(
            field::BENEFICIARY_ACCOUNT.into(),
            self.beneficiary_account.as_str().into(),
        );
        payload.insert(field::BENEFICIARY_NAME.into(), self.beneficiary_name.clone().into());
        payload.insert(
            field::BENEFICIARY_ACCOUNT_TYPE.into(),
            self.beneficiary_account_type().code().into(),
        );
        payload.insert(
            field::BENEFICIARY_TAX_ID.into(),
            self.beneficiary_tax_id.clone().into(),
        );
        payload.insert(
            field::COUNTERPARTY_INSTITUTION.into(),
            self.counterparty_institution.clone().into(),
        );
        payload.insert(field::PAYER_ACCOUNT.into(), self.payer_account.as_str().into());
        payload.insert(
            field::PAYER_ACCOUNT_TYPE.into(),
            AccountType::Clabe.code().into(),
        );
        if let Some(name) = &self.payer_name {
            payload.insert(field::PAYER_NAME.into(), name.clone().into());
        }
        if let Some(id) = &self.payer_tax_id {
            payload.insert(field::PAYER_TAX_ID.into(), id.clone().into());
        }
        payload.insert(field::TRACKING_KEY.into(), self.tracking_key.clone().into());
        payload.insert(field::NUMERIC_REFERENCE.into(), self.numeric_reference.into());
        payload.insert(field::DELIVERY_METHOD.into(), self.delivery_method.into());
        payload.insert(field::PAYMENT_TYPE.into(), self.payment_type.into());
        payload.insert(field::TOPOLOGY.into(), self.topology.as_str().into());
        if let Some(vat) = self.vat {
            payload.insert(field::VAT.into(), float(vat));
        }
        payload.insert(field::PRIORITY.into(), protocol::PRIORITY.into());
        payload.insert(
            field::OPERATING_INSTITUTION.into(),
            protocol::OPERATING_INSTITUTION.into(),
        );
        payload.insert(field::COMPANY.into(), company.into());
        payload
    }

    /// Signing input over the current field values.
    pub fn canonical_string(&self, company: &str) -> String {
        canonicalize(&self.to_payload(company), protocol::ORDER_FIELDNAMES)
    }
}

impl TryFrom<OrderFields> for OrderRecord {
    type Error = ValidationError;

    fn try_from(fields: OrderFields) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "is required"))
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn check_institution_shape(code: &str) -> Result<(), ValidationError> {
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            field::COUNTERPARTY_INSTITUTION,
            "must be 5 decimal digits",
        ));
    }
    Ok(())
}

fn parse_numeric_reference(number: &Number) -> Result<u32, ValidationError> {
    match number.as_u64() {
        Some(n) if n > 0 && n < u64::from(protocol::NUMERIC_REFERENCE_LIMIT) => Ok(n as u32),
        Some(_) => Err(ValidationError::new(
            field::NUMERIC_REFERENCE,
            format!(
                "must be greater than 0 and less than {}",
                protocol::NUMERIC_REFERENCE_LIMIT
            ),
        )),
        None => Err(ValidationError::new(
            field::NUMERIC_REFERENCE,
            "must be a positive integer",
        )),
    }
}

fn parse_unsigned(number: &Number, field: &'static str) -> Result<u32, ValidationError> {
    number
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ValidationError::new(field, "must be a non-negative integer"))
}

fn parse_tax_id(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.chars().count() > protocol::TAX_ID_LIMIT {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", protocol::TAX_ID_LIMIT),
        ));
    }
    Ok(value)
}

fn parse_vat(number: &Number) -> Result<f64, ValidationError> {
    match number.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ValidationError::new(field::VAT, "must be a non-negative number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn valid_fields() -> OrderFields {
        serde_json::from_value(json!({
            "monto": 1234.5,
            "conceptoPago": "Prueba",
            "cuentaBeneficiario": "072691004495711499",
            "nombreBeneficiario": "Ricardo Sánchez",
            "institucionContraparte": "40072",
            "cuentaOrdenante": "646180157000000004",
            "nombreOrdenante": "Empresa Ejemplo",
            "claveRastreo": "CUENCA1234",
            "referenciaNumerica": 5273144,
        }))
        .unwrap()
    }

    #[test]
    fn test_amount_requires_float() {
        assert!(Amount::from_number(&Number::from_f64(100.0).unwrap()).is_ok());
        let err = Amount::from_number(&Number::from(100u64)).unwrap_err();
        assert_eq!(err.field, field::AMOUNT);
    }

    #[test]
    fn test_amount_validation() {
        assert_eq!(Amount::new(12.34).unwrap().value(), dec!(12.34));
        assert!(Amount::new(0.0).is_err());
        assert!(Amount::new(-1.0).is_err());
        assert!(Amount::new(f64::NAN).is_err());
    }

    #[test]
    fn test_amount_representable_range() {
        let err = Amount::new(1e29).unwrap_err();
        assert_eq!(err.field, field::AMOUNT);
        assert!(err.reason.contains("exceeds the largest supported amount"));

        let err = Amount::new(1e-30).unwrap_err();
        assert_eq!(err.field, field::AMOUNT);
        assert!(err.reason.contains("below the smallest supported amount"));

        let tiny = Amount::new(1e-20).unwrap();
        assert!(tiny.value() > Decimal::ZERO);
        assert_eq!(tiny.as_f64(), 1e-20);
    }

    #[test]
    fn test_record_normalizes_text() {
        let record = OrderRecord::new(valid_fields()).unwrap();
        assert_eq!(record.beneficiary_name(), "Ricardo Sanchez");
        assert_eq!(record.payer_name(), Some("Empresa Ejemplo"));
        assert_eq!(record.amount().value(), dec!(1234.5));
    }

    #[test]
    fn test_record_applies_protocol_defaults() {
        let record = OrderRecord::new(valid_fields()).unwrap();
        assert_eq!(record.beneficiary_tax_id(), "ND");
        assert_eq!(record.payer_tax_id(), None);
        assert_eq!(record.delivery_method(), 3);
        assert_eq!(record.payment_type(), 1);
        assert_eq!(record.topology(), Topology::T);
        assert_eq!(record.vat(), None);
        assert_eq!(record.status(), OrderStatus::Constructed);
    }

    #[test]
    fn test_missing_required_field() {
        let mut fields = valid_fields();
        fields.payer_account = None;
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err, ValidationError::new(field::PAYER_ACCOUNT, "is required"));
    }

    #[test]
    fn test_institution_shape_checked_before_registry() {
        let mut fields = valid_fields();
        fields.counterparty_institution = Some("4007".to_string());
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err.reason, "must be 5 decimal digits");

        let mut fields = valid_fields();
        fields.counterparty_institution = Some("99999".to_string());
        let err = OrderRecord::new(fields).unwrap_err();
        assert!(err.reason.contains("does not correspond to a bank"));
    }

    #[test]
    fn test_range_checks_precede_registry_checks() {
        let mut fields = valid_fields();
        fields.counterparty_institution = Some("99999".to_string());
        fields.numeric_reference = Some(Number::from(0u64));
        fields.topology = Some("X".to_string());
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err.field, field::NUMERIC_REFERENCE);

        let mut fields = valid_fields();
        fields.payer_account = Some("999180157000000004".to_string());
        fields.topology = Some("X".to_string());
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err.field, field::TOPOLOGY);

        let mut fields = valid_fields();
        fields.counterparty_institution = Some("99999".to_string());
        fields.payer_tax_id = Some("A".repeat(19));
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err.field, field::PAYER_TAX_ID);
    }

    #[test]
    fn test_try_from_fields() {
        let record = OrderRecord::try_from(valid_fields()).unwrap();
        assert_eq!(record, OrderRecord::new(valid_fields()).unwrap());

        let mut fields = valid_fields();
        fields.beneficiary_name = None;
        let err = OrderRecord::try_from(fields).unwrap_err();
        assert_eq!(err.field, field::BENEFICIARY_NAME);
    }

    #[test]
    fn test_numeric_reference_bounds() {
        for bad in [json!(0), json!(10_000_000), json!(-5), json!(12.5)] {
            let mut fields = valid_fields();
            fields.numeric_reference = serde_json::from_value(bad).unwrap();
            let err = OrderRecord::new(fields).unwrap_err();
            assert_eq!(err.field, field::NUMERIC_REFERENCE);
        }
        let mut fields = valid_fields();
        fields.numeric_reference = Some(Number::from(9_999_999u32));
        assert_eq!(OrderRecord::new(fields).unwrap().numeric_reference(), 9_999_999);
    }

    #[test]
    fn test_tax_id_rejected_when_too_long() {
        let mut fields = valid_fields();
        fields.payer_tax_id = Some("A".repeat(19));
        let err = OrderRecord::new(fields).unwrap_err();
        assert_eq!(err.field, field::PAYER_TAX_ID);
    }

    #[test]
    fn test_tracking_key_truncated() {
        let mut fields = valid_fields();
        fields.tracking_key = Some("X".repeat(40));
        let record = OrderRecord::new(fields).unwrap();
        assert_eq!(record.tracking_key().len(), 29);
    }

    #[test]
    fn test_topology_and_vat() {
        let mut fields = valid_fields();
        fields.topology = Some("V".to_string());
        fields.vat = Some(Number::from(16u64));
        let record = OrderRecord::new(fields).unwrap();
        assert_eq!(record.topology(), Topology::V);
        assert_eq!(record.vat(), Some(16.0));

        let mut fields = valid_fields();
        fields.topology = Some("X".to_string());
        assert_eq!(OrderRecord::new(fields).unwrap_err().field, field::TOPOLOGY);
    }

    #[test]
    fn test_bind_id_once() {
        let mut record = OrderRecord::new(valid_fields()).unwrap();
        record.bind_id(42).unwrap();
        assert_eq!(record.status(), OrderStatus::Submitted(42));
        assert!(matches!(
            record.bind_id(43),
            Err(OrderError::AlreadySubmitted(42))
        ));
        assert_eq!(record.assigned_id(), Some(42));
    }

    #[test]
    fn test_payload_carries_derived_and_constant_fields() {
        let record = OrderRecord::new(valid_fields()).unwrap();
        let payload = record.to_payload("EMPRESA");
        assert_eq!(payload[field::BENEFICIARY_ACCOUNT_TYPE], json!(40));
        assert_eq!(payload[field::PAYER_ACCOUNT_TYPE], json!(40));
        assert_eq!(payload[field::PRIORITY], json!(1));
        assert_eq!(payload[field::OPERATING_INSTITUTION], json!("90646"));
        assert_eq!(payload[field::COMPANY], json!("EMPRESA"));
        assert_eq!(payload[field::AMOUNT], json!(1234.5));
        assert!(!payload.contains_key(field::VAT));
        assert!(!payload.contains_key(field::ID));
        assert!(!payload.contains_key(field::SIGNATURE));
    }
}
