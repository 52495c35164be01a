use crate::error::TypeError;

/// Balance amount in base units, the smallest indivisible unit of value.
///
/// One whole unit is [`UNIT`] base units. All ledger arithmetic happens
/// in base units; decimal strings exist only at the CLI surface.
pub type Amount = u128;

/// Base units per whole unit (18 decimal places).
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Parse a decimal unit literal (e.g. `"1.5"`, `"0.001"`) into base units.
///
/// Accepts at most 18 fractional digits. Rejects empty strings, bare
/// dots, and anything that is not ASCII digits around a single dot.
pub fn parse_amount(s: &str) -> Result<Amount, TypeError> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(TypeError::InvalidAmount(s.into()));
    }
    if frac.len() > 18 {
        return Err(TypeError::InvalidAmount(format!(
            "{s}: more than 18 fractional digits"
        )));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(TypeError::InvalidAmount(s.into()));
    }

    let whole_units: Amount = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| TypeError::InvalidAmount(s.into()))?
    };
    let frac_units: Amount = if frac.is_empty() {
        0
    } else {
        let scale = 10u128.pow((18 - frac.len()) as u32);
        let digits: Amount = frac
            .parse()
            .map_err(|_| TypeError::InvalidAmount(s.into()))?;
        digits * scale
    };

    whole_units
        .checked_mul(UNIT)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| TypeError::InvalidAmount(format!("{s}: out of range")))
}

/// Format base units as a decimal unit string, trimming trailing zeros.
pub fn format_amount(amount: Amount) -> String {
    let whole = amount / UNIT;
    let frac = amount % UNIT;
    if frac == 0 {
        return format!("{whole}.0");
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_units() {
        assert_eq!(parse_amount("1").unwrap(), UNIT);
        assert_eq!(parse_amount("10").unwrap(), 10 * UNIT);
        assert_eq!(parse_amount("0").unwrap(), 0);
    }

    #[test]
    fn parses_fractional_units() {
        assert_eq!(parse_amount("1.0").unwrap(), UNIT);
        assert_eq!(parse_amount("0.001").unwrap(), UNIT / 1000);
        assert_eq!(parse_amount("0.5").unwrap(), UNIT / 2);
        assert_eq!(parse_amount(".5").unwrap(), UNIT / 2);
        assert_eq!(parse_amount("1.000000000000000001").unwrap(), UNIT + 1);
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount(".").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1e18").is_err());
        assert!(parse_amount("0.0000000000000000001").is_err()); // 19 digits
    }

    #[test]
    fn formats_trimming_trailing_zeros() {
        assert_eq!(format_amount(UNIT), "1.0");
        assert_eq!(format_amount(0), "0.0");
        assert_eq!(format_amount(UNIT / 2), "0.5");
        assert_eq!(format_amount(UNIT + 1), "1.000000000000000001");
        assert_eq!(format_amount(5 * UNIT / 10_000), "0.0005");
    }

    #[test]
    fn parse_format_roundtrip() {
        for s in ["1.0", "0.0005", "123.456", "0.000000000000000001"] {
            let amount = parse_amount(s).unwrap();
            assert_eq!(format_amount(amount), s);
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn formatted_amounts_reparse_exactly(amount in any::<Amount>()) {
                prop_assert_eq!(parse_amount(&format_amount(amount)).unwrap(), amount);
            }

            #[test]
            fn parser_is_total(s in "\\PC{0,24}") {
                // Arbitrary printable input must parse or error, never panic.
                let _ = parse_amount(&s);
            }
        }
    }
}
