use crate::domain::bank::{Bank, BankCodeRegistry};
use crate::error::{OrderError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct BankRow {
    abm: String,
    code: String,
    name: String,
}

/// Reads a bank-code registry from CSV with an `abm,code,name` header.
///
/// Every row must carry a 3-digit ABM prefix and a 5-digit institution code.
pub struct BankCodeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> BankCodeReader<R> {
    /// Creates a new `BankCodeReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and checks each bank row.
    pub fn banks(self) -> impl Iterator<Item = Result<Bank>> {
        self.reader
            .into_deserialize::<BankRow>()
            .map(|result| result.map_err(OrderError::from).and_then(check_row))
    }

    /// Reads every row into a registry, failing on the first bad row.
    pub fn into_registry(self) -> Result<BankCodeRegistry> {
        let banks = self.banks().collect::<Result<Vec<_>>>()?;
        Ok(BankCodeRegistry::new(banks))
    }
}

fn check_row(row: BankRow) -> Result<Bank> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(&row.abm, 3) || !digits(&row.code, 5) {
        return Err(OrderError::InvalidRegistry(format!(
            "bank row {},{} must have a 3-digit prefix and a 5-digit code",
            row.abm, row.code
        )));
    }
    Ok(Bank {
        abm: row.abm,
        code: row.code,
        name: row.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "abm, code, name\n072, 40072, BANORTE\n646, 90646, STP";
        let registry = BankCodeReader::new(data.as_bytes()).into_registry().unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("90646"));
        assert_eq!(registry.institution_for_prefix("072"), Some("40072"));
    }

    #[test]
    fn test_reader_malformed_code() {
        let data = "abm, code, name\n072, 4007, BANORTE";
        let results: Vec<Result<Bank>> = BankCodeReader::new(data.as_bytes()).banks().collect();

        assert!(results[0].is_err());
    }

    #[test]
    fn test_reader_missing_column() {
        let data = "abm, code\n072, 40072";
        assert!(BankCodeReader::new(data.as_bytes()).into_registry().is_err());
    }
}
