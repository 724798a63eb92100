use super::Token;
use alloy_primitives::U256;
use eyre::{Result, bail, eyre};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Parts-per-million denominator shared by slippage and percent fees.
pub const PPM: u64 = 1_000_000;

/// floor(value * ppm / 1_000_000), exact over the full `U256` range.
pub fn apply_ppm(value: U256, ppm: u32) -> U256 {
    let denom = U256::from(PPM);
    let factor = U256::from(ppm);
    match value.checked_mul(factor) {
        Some(scaled) => scaled / denom,
        // Only the intermediate product can overflow. Splitting the value
        // into quotient and remainder keeps the result exact.
        None => (value / denom) * factor + (value % denom) * factor / denom,
    }
}

/// An amount of a specific token, held in atomic units. Conversions to and
/// from human-readable decimal strings are pure integer math and round-trip
/// without loss for any `decimals`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    token: Token,
    wei: U256,
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_human_string(), self.token.get_symbol())
    }
}

impl TokenAmount {
    pub fn new(token: Token, wei: U256) -> TokenAmount {
        TokenAmount { token, wei }
    }

    pub fn zero(token: Token) -> TokenAmount {
        TokenAmount { token, wei: U256::ZERO }
    }

    /// Parses a human-readable decimal string ("12.5") into atomic units.
    /// Digits beyond the token's precision are rejected unless they are
    /// zeros, so anything this type prints parses back to the same value.
    pub fn from_human_str(token: Token, value: &str) -> Result<TokenAmount> {
        let value = value.trim();
        let (int_part, frac_part) = match value.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (value, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            bail!("empty amount");
        }
        if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
            bail!("invalid amount {value:?}");
        }

        let decimals = token.get_decimals() as usize;
        let (kept, dropped) = frac_part.split_at(frac_part.len().min(decimals));
        if dropped.bytes().any(|b| b != b'0') {
            bail!("amount {value:?} exceeds {decimals} decimal places");
        }

        let mut digits = String::with_capacity(int_part.len().max(1) + decimals);
        digits.push_str(if int_part.is_empty() { "0" } else { int_part });
        digits.push_str(kept);
        for _ in kept.len()..decimals {
            digits.push('0');
        }

        let wei = U256::from_str_radix(&digits, 10).map_err(|e| eyre!("amount {value:?} does not fit: {e}"))?;
        Ok(TokenAmount { token, wei })
    }

    /// Exact inverse of `from_human_str`: no exponent notation, no rounding,
    /// trailing zeros trimmed.
    pub fn to_human_string(&self) -> String {
        let decimals = self.token.get_decimals();
        if decimals == 0 {
            return self.wei.to_string();
        }
        let exp = match U256::from(10).checked_pow(U256::from(decimals)) {
            Some(exp) => exp,
            None => return self.wei.to_string(),
        };
        let (int_part, rem) = self.wei.div_rem(exp);
        if rem.is_zero() {
            return int_part.to_string();
        }

        let rem_str = rem.to_string();
        let mut frac = String::with_capacity(decimals as usize);
        for _ in rem_str.len()..decimals as usize {
            frac.push('0');
        }
        frac.push_str(&rem_str);
        format!("{}.{}", int_part, frac.trim_end_matches('0'))
    }

    pub fn get_token(&self) -> &Token {
        &self.token
    }

    pub fn get_wei(&self) -> U256 {
        self.wei
    }

    pub fn with_wei(&self, wei: U256) -> TokenAmount {
        TokenAmount { token: self.token.clone(), wei }
    }

    pub fn is_zero(&self) -> bool {
        self.wei.is_zero()
    }

    /// Lower bound after slippage, floored.
    pub fn wei_minus_slippage(&self, slippage_ppm: u32) -> U256 {
        self.wei - apply_ppm(self.wei, slippage_ppm.min(PPM as u32))
    }

    /// Upper bound after slippage.
    pub fn wei_plus_slippage(&self, slippage_ppm: u32) -> U256 {
        self.wei.saturating_add(apply_ppm(self.wei, slippage_ppm))
    }

    /// Display-only.
    pub fn to_float(&self) -> f64 {
        self.token.to_float(self.wei)
    }
}
