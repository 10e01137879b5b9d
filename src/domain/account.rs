use super::bank::BankCodeRegistry;
use super::protocol::field;
use crate::error::ValidationError;
use serde::{Serialize, Serializer};
use std::fmt;

const CLABE_LENGTH: usize = 18;
const CLABE_WEIGHTS: [u32; 3] = [3, 7, 1];

/// Account-type tag sent alongside an account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// 18-digit domestic clearing account (CLABE).
    Clabe,
    /// 15 or 16 digit payment card.
    Card,
    /// 10-digit mobile phone number.
    Phone,
}

impl AccountType {
    /// Numeric value of the tag on the wire.
    pub fn code(self) -> u8 {
        match self {
            AccountType::Card => 3,
            AccountType::Phone => 10,
            AccountType::Clabe => 40,
        }
    }
}

impl Serialize for AccountType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// Infers the account type from the number of decimal digits.
///
/// Only the length is considered; check digits are not verified here.
pub fn classify(account: &str) -> Result<AccountType, ValidationError> {
    if account.is_empty() || !account.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            field::BENEFICIARY_ACCOUNT,
            "must contain only decimal digits",
        ));
    }
    match account.len() {
        18 => Ok(AccountType::Clabe),
        15 | 16 => Ok(AccountType::Card),
        10 => Ok(AccountType::Phone),
        len => Err(ValidationError::new(
            field::BENEFICIARY_ACCOUNT,
            format!("{len} is not a valid account length"),
        )),
    }
}

/// Beneficiary account, one variant per supported account type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeneficiaryAccount {
    Clabe(String),
    Card(String),
    Phone(String),
}

impl BeneficiaryAccount {
    pub fn parse(account: &str) -> Result<Self, ValidationError> {
        let digits = account.to_string();
        Ok(match classify(account)? {
            AccountType::Clabe => BeneficiaryAccount::Clabe(digits),
            AccountType::Card => BeneficiaryAccount::Card(digits),
            AccountType::Phone => BeneficiaryAccount::Phone(digits),
        })
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            BeneficiaryAccount::Clabe(_) => AccountType::Clabe,
            BeneficiaryAccount::Card(_) => AccountType::Card,
            BeneficiaryAccount::Phone(_) => AccountType::Phone,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BeneficiaryAccount::Clabe(digits)
            | BeneficiaryAccount::Card(digits)
            | BeneficiaryAccount::Phone(digits) => digits,
        }
    }
}

impl fmt::Display for BeneficiaryAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check-digit verified 18-digit clearing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clabe(String);

impl Clabe {
    /// Checks that `account` is 18 decimal digits, without consulting a registry.
    pub fn check_shape(account: &str, field: &'static str) -> Result<(), ValidationError> {
        if account.len() != CLABE_LENGTH || !account.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new(field, "must be 18 decimal digits"));
        }
        Ok(())
    }

    /// Validates length, bank prefix and control digit.
    pub fn parse(
        account: &str,
        registry: &BankCodeRegistry,
        field: &'static str,
    ) -> Result<Self, ValidationError> {
        Self::check_shape(account, field)?;
        if registry.institution_for_prefix(&account[..3]).is_none() {
            return Err(ValidationError::new(
                field,
                format!("{} is not a known bank prefix", &account[..3]),
            ));
        }
        let expected = control_digit(&account[..CLABE_LENGTH - 1]);
        let actual = account.as_bytes()[CLABE_LENGTH - 1] - b'0';
        if u32::from(actual) != expected {
            return Err(ValidationError::new(field, "invalid control digit"));
        }
        Ok(Self(account.to_string()))
    }

    /// 3-digit prefix identifying the holding bank.
    pub fn bank_prefix(&self) -> &str {
        &self.0[..3]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Clabe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weighted control digit over the first 17 digits of a clearing account.
pub fn control_digit(digits: &str) -> u32 {
    let sum: u32 = digits
        .bytes()
        .zip(CLABE_WEIGHTS.iter().cycle())
        .map(|(b, w)| (u32::from(b - b'0') * w) % 10)
        .sum();
    (10 - sum % 10) % 10
}
