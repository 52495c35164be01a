//! Linear interest accrual arithmetic.
//!
//! Interest accrues continuously-but-linearly against principal as of
//! the last accrual point. There is no compounding between accrual
//! events: pending interest is never itself interest-bearing until it
//! has been realized into principal.

use coffer_types::Amount;

use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// Accrual year length: 365 days, in seconds.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 3600;

/// Interest pending since `last_accrual`, in base units.
///
/// Computed as `principal * rate * elapsed / (precision * year)` with
/// floor division. Elapsed time saturates at zero if `now` is behind
/// `last_accrual` (the engine's clock high-water mark makes that
/// unreachable in practice).
pub fn pending_interest(
    principal: Amount,
    last_accrual: u64,
    now: u64,
    config: &LedgerConfig,
) -> Result<Amount, LedgerError> {
    let elapsed = now.saturating_sub(last_accrual);
    if principal == 0 || elapsed == 0 {
        return Ok(0);
    }
    let denominator = config
        .rate_precision
        .checked_mul(SECONDS_PER_YEAR as u128)
        .ok_or(LedgerError::AmountOverflow)?;
    principal
        .checked_mul(config.interest_rate)
        .and_then(|x| x.checked_mul(elapsed as u128))
        // checked_div also rejects a zero precision in the config.
        .and_then(|x| x.checked_div(denominator))
        .ok_or(LedgerError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use coffer_types::UNIT;

    use super::*;

    #[test]
    fn zero_elapsed_yields_zero() {
        let config = LedgerConfig::default();
        assert_eq!(pending_interest(UNIT, 1000, 1000, &config).unwrap(), 0);
    }

    #[test]
    fn zero_principal_yields_zero() {
        let config = LedgerConfig::default();
        assert_eq!(
            pending_interest(0, 0, SECONDS_PER_YEAR, &config).unwrap(),
            0
        );
    }

    #[test]
    fn one_year_on_one_unit() {
        let config = LedgerConfig::default();
        let interest = pending_interest(UNIT, 0, SECONDS_PER_YEAR, &config).unwrap();
        // 1.0 * 5 / 10_000 = 0.0005 units
        assert_eq!(interest, UNIT * 5 / 10_000);
        assert_eq!(interest, 500_000_000_000_000);
    }

    #[test]
    fn thirty_days_on_one_unit() {
        let config = LedgerConfig::default();
        let elapsed = 30 * 24 * 3600;
        let interest = pending_interest(UNIT, 0, elapsed, &config).unwrap();
        let expected =
            UNIT * 5 * elapsed as u128 / (10_000 * SECONDS_PER_YEAR as u128);
        assert_eq!(interest, expected);
        assert!(interest > 0);
    }

    #[test]
    fn division_floors() {
        let config = LedgerConfig::default();
        // Tiny principal over one second floors to zero.
        assert_eq!(pending_interest(1, 0, 1, &config).unwrap(), 0);
    }

    #[test]
    fn clock_regression_saturates_to_zero() {
        let config = LedgerConfig::default();
        assert_eq!(pending_interest(UNIT, 2000, 1000, &config).unwrap(), 0);
    }

    #[test]
    fn zero_precision_is_an_error_not_a_panic() {
        let config = LedgerConfig {
            rate_precision: 0,
            ..LedgerConfig::default()
        };
        let error = pending_interest(UNIT, 0, SECONDS_PER_YEAR, &config).unwrap_err();
        assert_eq!(error, LedgerError::AmountOverflow);
    }

    #[test]
    fn overflow_is_reported() {
        let config = LedgerConfig::default();
        let error =
            pending_interest(Amount::MAX, 0, SECONDS_PER_YEAR, &config).unwrap_err();
        assert_eq!(error, LedgerError::AmountOverflow);
    }
}
