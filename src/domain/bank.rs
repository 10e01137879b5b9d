use crate::error::{OrderError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

static REGISTRY: OnceLock<BankCodeRegistry> = OnceLock::new();

/// `(ABM prefix, institution code, short name)` of known participants.
const DEFAULT_BANKS: &[(&str, &str, &str)] = &[
    ("002", "40002", "BANAMEX"),
    ("006", "37006", "BANCOMEXT"),
    ("009", "37009", "BANOBRAS"),
    ("012", "40012", "BBVA MEXICO"),
    ("014", "40014", "SANTANDER"),
    ("019", "37019", "BANJERCITO"),
    ("021", "40021", "HSBC"),
    ("030", "40030", "BAJIO"),
    ("036", "40036", "INBURSA"),
    ("042", "40042", "MIFEL"),
    ("044", "40044", "SCOTIABANK"),
    ("058", "40058", "BANREGIO"),
    ("059", "40059", "INVEX"),
    ("060", "40060", "BANSI"),
    ("062", "40062", "AFIRME"),
    ("072", "40072", "BANORTE"),
    ("103", "40103", "AMERICAN EXPRESS"),
    ("106", "40106", "BANK OF AMERICA"),
    ("108", "40108", "MUFG"),
    ("110", "40110", "JP MORGAN"),
    ("112", "40112", "BMONEX"),
    ("113", "40113", "VE POR MAS"),
    ("124", "40124", "DEUTSCHE"),
    ("126", "40126", "CREDIT SUISSE"),
    ("127", "40127", "AZTECA"),
    ("128", "40128", "AUTOFIN"),
    ("129", "40129", "BARCLAYS"),
    ("130", "40130", "COMPARTAMOS"),
    ("132", "40132", "MULTIVA BANCO"),
    ("133", "40133", "ACTINVER"),
    ("135", "37135", "NAFIN"),
    ("136", "40136", "INTERCAM BANCO"),
    ("137", "40137", "BANCOPPEL"),
    ("138", "40138", "ABC CAPITAL"),
    ("140", "40140", "CONSUBANCO"),
    ("141", "40141", "VOLKSWAGEN"),
    ("143", "40143", "CIBANCO"),
    ("145", "40145", "BBASE"),
    ("147", "40147", "BANKAOOL"),
    ("148", "40148", "PAGATODO"),
    ("150", "40150", "INMOBILIARIO"),
    ("151", "40151", "DONDE"),
    ("152", "40152", "BANCREA"),
    ("154", "40154", "BANCO FINTERRA"),
    ("155", "40155", "ICBC"),
    ("156", "40156", "SABADELL"),
    ("157", "40157", "SHINHAN"),
    ("158", "40158", "MIZUHO BANK"),
    ("160", "40160", "BANCO S3"),
    ("166", "37166", "BANCO DEL BIENESTAR"),
    ("168", "37168", "HIPOTECARIA FEDERAL"),
    ("600", "90600", "MONEXCB"),
    ("601", "90601", "GBM"),
    ("602", "90602", "MASARI"),
    ("605", "90605", "VALUE"),
    ("608", "90608", "VECTOR"),
    ("616", "90616", "FINAMEX"),
    ("617", "90617", "VALMEX"),
    ("620", "90620", "PROFUTURO"),
    ("630", "90630", "CB INTERCAM"),
    ("631", "90631", "CI BOLSA"),
    ("634", "90634", "FINCOMUN"),
    ("638", "90638", "AKALA"),
    ("642", "90642", "REFORMA"),
    ("646", "90646", "STP"),
    ("652", "90652", "CREDICAPITAL"),
    ("653", "90653", "KUSPIT"),
    ("656", "90656", "UNAGRA"),
    ("659", "90659", "ASP INTEGRA OPC"),
    ("670", "90670", "LIBERTAD"),
    ("677", "90677", "CAJA POP MEXICA"),
    ("680", "90680", "CRISTOBAL COLON"),
    ("683", "90683", "CAJA TELEFONIST"),
    ("684", "90684", "TRANSFER"),
    ("685", "90685", "FONDO (FIRA)"),
    ("686", "90686", "INVERCAP"),
    ("689", "90689", "FOMPED"),
    ("706", "90706", "ARCUS"),
    ("710", "90710", "NVIO"),
    ("722", "90722", "MERCADO PAGO"),
    ("723", "90723", "CUENCA"),
    ("901", "90901", "CLS"),
    ("902", "90902", "INDEVAL"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub abm: String,
    pub code: String,
    pub name: String,
}

/// Read-only lookup of the 5-digit institution codes accepted by the gateway.
///
/// A process installs at most one registry, at startup, through
/// [`BankCodeRegistry::install`]. Without an explicit install the embedded
/// table is used.
#[derive(Debug, Clone, Default)]
pub struct BankCodeRegistry {
    by_code: HashMap<String, Bank>,
    by_abm: HashMap<String, String>,
}

impl BankCodeRegistry {
    pub fn new(banks: impl IntoIterator<Item = Bank>) -> Self {
        let mut registry = Self::default();
        for bank in banks {
            registry.by_abm.insert(bank.abm.clone(), bank.code.clone());
            registry.by_code.insert(bank.code.clone(), bank);
        }
        registry
    }

    /// The registry compiled into the crate.
    pub fn embedded() -> Self {
        Self::new(DEFAULT_BANKS.iter().map(|(abm, code, name)| Bank {
            abm: abm.to_string(),
            code: code.to_string(),
            name: name.to_string(),
        }))
    }

    /// Installs the process-wide registry. Fails if one is already in place.
    pub fn install(registry: BankCodeRegistry) -> Result<&'static BankCodeRegistry> {
        REGISTRY
            .set(registry)
            .map_err(|_| OrderError::RegistryAlreadyInstalled)?;
        Ok(Self::global())
    }

    /// The process-wide registry, defaulting to [`BankCodeRegistry::embedded`].
    pub fn global() -> &'static BankCodeRegistry {
        REGISTRY.get_or_init(Self::embedded)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Institution code for the 3-digit prefix of a clearing account.
    pub fn institution_for_prefix(&self, abm: &str) -> Option<&str> {
        self.by_abm.get(abm).map(String::as_str)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(|bank| bank.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_registry_lookups() {
        let registry = BankCodeRegistry::embedded();
        assert!(registry.contains("40072"));
        assert!(registry.contains("90646"));
        assert!(!registry.contains("99999"));
        assert_eq!(registry.institution_for_prefix("072"), Some("40072"));
        assert_eq!(registry.name("90646"), Some("STP"));
        assert_eq!(registry.institution_for_prefix("999"), None);
    }

    #[test]
    fn test_custom_registry() {
        let registry = BankCodeRegistry::new([Bank {
            abm: "999".to_string(),
            code: "99999".to_string(),
            name: "TEST".to_string(),
        }]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("99999"));
        assert!(!registry.contains("40072"));
    }
}
