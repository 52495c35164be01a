use coffer_types::{Amount, UNIT};
use serde::{Deserialize, Serialize};

/// Fixed protocol parameters for a ledger instance.
///
/// The defaults are the protocol constants; tests inject alternates.
/// The annual interest rate is `interest_rate / rate_precision`
/// (5 / 10_000 = 0.05% per year by default).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Interest rate numerator.
    pub interest_rate: u128,
    /// Interest rate denominator.
    pub rate_precision: u128,
    /// Smallest deposit the ledger accepts, in base units.
    pub min_deposit: Amount,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            interest_rate: 5,
            rate_precision: 10_000,
            min_deposit: UNIT / 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_protocol_constants() {
        let config = LedgerConfig::default();
        assert_eq!(config.interest_rate, 5);
        assert_eq!(config.rate_precision, 10_000);
        assert_eq!(config.min_deposit, 1_000_000_000_000_000);
    }

    #[test]
    fn serde_roundtrip() {
        let config = LedgerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
