use crate::chains::BlockchainName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Every failure a provider or the manager can surface. Adapters translate
/// raw provider errors into this taxonomy at their boundary; nothing
/// downstream inspects provider-specific strings or codes.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapError {
    #[error("Swap between these tokens is not supported")]
    NotSupportedTokens,
    #[error("Wallet is connected to the wrong network, {required} is required")]
    WrongNetwork { required: BlockchainName },
    #[error("Amount is too low to cover the fee")]
    AmountTooLow,
    #[error("Minimum amount is {amount} {symbol}")]
    MinAmount { amount: String, symbol: String },
    #[error("Maximum amount is {amount} {symbol}")]
    MaxAmount { amount: String, symbol: String },
    #[error("Provider is unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Calculation was cancelled")]
    Cancelled,
    #[error("{0}")]
    Unknown(String),
}

impl SwapError {
    pub fn min_amount(amount: impl Into<String>, symbol: impl Into<String>) -> SwapError {
        SwapError::MinAmount { amount: amount.into(), symbol: symbol.into() }
    }

    pub fn max_amount(amount: impl Into<String>, symbol: impl Into<String>) -> SwapError {
        SwapError::MaxAmount { amount: amount.into(), symbol: symbol.into() }
    }

    pub fn unavailable(reason: impl Into<String>) -> SwapError {
        SwapError::ProviderUnavailable(reason.into())
    }

    pub fn unknown(message: impl Into<String>) -> SwapError {
        SwapError::Unknown(message.into())
    }
}

/// Lower rank reads as more informative to the caller: threshold errors say
/// what to change, unavailability says nothing.
fn class_rank(error: &SwapError) -> u8 {
    match error {
        SwapError::MinAmount { .. } => 0,
        SwapError::MaxAmount { .. } => 1,
        SwapError::AmountTooLow => 2,
        SwapError::NotSupportedTokens => 3,
        SwapError::WrongNetwork { .. } => 4,
        SwapError::ProviderUnavailable(_) => 5,
        SwapError::Cancelled => 6,
        SwapError::Unknown(_) => 7,
    }
}

/// Collapses the failures of an all-failed calculation into the single error
/// worth showing. Threshold errors win, and among them the least demanding
/// one: the lowest minimum, the highest maximum.
pub fn most_informative(errors: &[SwapError]) -> Option<SwapError> {
    errors
        .iter()
        .min_by(|a, b| {
            class_rank(a).cmp(&class_rank(b)).then_with(|| match (a, b) {
                (SwapError::MinAmount { amount: a, .. }, SwapError::MinAmount { amount: b, .. }) => {
                    cmp_decimal_str(a, b)
                }
                (SwapError::MaxAmount { amount: a, .. }, SwapError::MaxAmount { amount: b, .. }) => {
                    cmp_decimal_str(b, a)
                }
                _ => Ordering::Equal,
            })
        })
        .cloned()
}

/// Extracts the trailing dollar-denominated threshold from a raw provider
/// message, e.g. "Transit amount is too low, min: $2.5" -> "2.5".
pub fn threshold_after_last_dollar(message: &str) -> Option<String> {
    let index = message.rfind('$')?;
    let tail = message[index + 1..].trim_start();
    let re = Regex::new(r"^[0-9]+(\.[0-9]+)?").unwrap();
    re.find(tail).map(|m| m.as_str().to_string())
}

/// Compares two decimal strings numerically without going through floats.
pub(crate) fn cmp_decimal_str(a: &str, b: &str) -> Ordering {
    fn split(value: &str) -> (&str, &str) {
        match value.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (value, ""),
        }
    }
    let (a_int, a_frac) = split(a);
    let (b_int, b_frac) = split(b);
    let a_int = a_int.trim_start_matches('0');
    let b_int = b_int.trim_start_matches('0');

    let int_ordering = a_int.len().cmp(&b_int.len()).then_with(|| a_int.cmp(b_int));
    if int_ordering != Ordering::Equal {
        return int_ordering;
    }

    let len = a_frac.len().max(b_frac.len());
    for i in 0..len {
        let da = a_frac.as_bytes().get(i).copied().unwrap_or(b'0');
        let db = b_frac.as_bytes().get(i).copied().unwrap_or(b'0');
        match da.cmp(&db) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", SwapError::min_amount("2.5", "USDC")),
            "Minimum amount is 2.5 USDC"
        );
        assert_eq!(
            format!("{}", SwapError::WrongNetwork { required: BlockchainName::Polygon }),
            "Wallet is connected to the wrong network, POLYGON is required"
        );
        assert_eq!(format!("{}", SwapError::unknown("boom")), "boom");
    }

    #[test]
    fn test_threshold_extraction() {
        assert_eq!(threshold_after_last_dollar("min amount: $2.5").as_deref(), Some("2.5"));
        assert_eq!(threshold_after_last_dollar("fee $1 out of $10 total").as_deref(), Some("10"));
        assert_eq!(threshold_after_last_dollar("$ 42").as_deref(), Some("42"));
        assert_eq!(threshold_after_last_dollar("no threshold here"), None);
        assert_eq!(threshold_after_last_dollar("trailing dollar $"), None);
    }

    #[test]
    fn test_cmp_decimal_str() {
        assert_eq!(cmp_decimal_str("2.5", "10"), Ordering::Less);
        assert_eq!(cmp_decimal_str("10", "2.5"), Ordering::Greater);
        assert_eq!(cmp_decimal_str("0.30", "0.3"), Ordering::Equal);
        assert_eq!(cmp_decimal_str("0.29", "0.3"), Ordering::Less);
        assert_eq!(cmp_decimal_str("007", "7"), Ordering::Equal);
        assert_eq!(cmp_decimal_str("1.0001", "1.001"), Ordering::Less);
    }

    #[test]
    fn test_most_informative_prefers_lowest_minimum() {
        let errors = vec![
            SwapError::min_amount("10", "USDC"),
            SwapError::min_amount("2.5", "USDC"),
            SwapError::min_amount("100", "USDC"),
        ];
        assert_eq!(most_informative(&errors), Some(SwapError::min_amount("2.5", "USDC")));
    }

    #[test]
    fn test_most_informative_prefers_highest_maximum() {
        let errors = vec![
            SwapError::max_amount("1000", "USDC"),
            SwapError::max_amount("5000", "USDC"),
        ];
        assert_eq!(most_informative(&errors), Some(SwapError::max_amount("5000", "USDC")));
    }

    #[test]
    fn test_most_informative_ranks_classes() {
        let errors = vec![
            SwapError::unknown("opaque failure"),
            SwapError::unavailable("timed out"),
            SwapError::min_amount("2.5", "USDC"),
        ];
        assert_eq!(most_informative(&errors), Some(SwapError::min_amount("2.5", "USDC")));

        let errors = vec![SwapError::unknown("opaque failure"), SwapError::unavailable("timed out")];
        assert_eq!(most_informative(&errors), Some(SwapError::unavailable("timed out".to_string())));

        assert_eq!(most_informative(&[]), None);
    }
}
