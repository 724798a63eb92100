use crate::errors::SwapError;
use crate::tokens::{PPM, Token, TokenAmount};
use alloy_primitives::U256;
use eyre::{Result, bail};
use serde::{Deserialize, Serialize};

/// Platform fee percentage held in parts per million, so 0.3% is 3000 ppm.
/// Fee math never leaves integer space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeePercent(u32);

impl FeePercent {
    pub const ZERO: FeePercent = FeePercent(0);

    pub fn from_ppm(ppm: u32) -> Result<FeePercent> {
        if ppm as u64 >= PPM {
            bail!("percent fee must stay below 100%, got {ppm} ppm");
        }
        Ok(FeePercent(ppm))
    }

    /// From a fraction in [0, 1), e.g. 0.003 for 0.3%. The float exists only
    /// at the configuration boundary.
    pub fn from_fraction(fraction: f64) -> Result<FeePercent> {
        if !(0.0..1.0).contains(&fraction) {
            bail!("percent fee fraction must be within [0, 1), got {fraction}");
        }
        // Rounding can land exactly on 100%, which from_ppm rejects.
        FeePercent::from_ppm((fraction * PPM as f64).round() as u32)
    }

    pub fn as_ppm(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// floor(amount * percent), exact.
    pub fn part_of(&self, amount: U256) -> U256 {
        crate::tokens::apply_ppm(amount, self.0)
    }
}

/// Flat fee denominated in a concrete token, typically the source chain's
/// native asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    pub amount: U256,
    pub token: Token,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeInfo {
    pub percent: FeePercent,
    pub fixed: Option<FixedFee>,
}

impl FeeInfo {
    pub fn zero() -> FeeInfo {
        FeeInfo::default()
    }

    pub fn is_zero(&self) -> bool {
        self.percent.is_zero() && self.fixed.is_none()
    }
}

/// What is left of the input after platform fees, plus the deducted parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeOutcome {
    pub adjusted: TokenAmount,
    pub percent_fee_wei: U256,
    pub fixed_fee_wei: U256,
}

/// Deducts the percentage fee first, then the fixed fee. A fixed fee in a
/// token other than the input is charged alongside the swap and therefore
/// recorded but not deducted here. The remainder is never negative; an
/// exhausted input surfaces as `AmountTooLow`.
pub fn apply_fees(input: &TokenAmount, fee_info: &FeeInfo) -> Result<FeeOutcome, SwapError> {
    let percent_fee_wei = fee_info.percent.part_of(input.get_wei());
    let remaining = input.get_wei() - percent_fee_wei;

    let fixed_fee_wei = match &fee_info.fixed {
        Some(fixed) if fixed.token == *input.get_token() => fixed.amount,
        _ => U256::ZERO,
    };
    let remaining = remaining.saturating_sub(fixed_fee_wei);
    if remaining.is_zero() {
        return Err(SwapError::AmountTooLow);
    }

    Ok(FeeOutcome { adjusted: input.with_wei(remaining), percent_fee_wei, fixed_fee_wei })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::BlockchainName;

    fn input(wei: u64) -> TokenAmount {
        let token = Token::new(BlockchainName::Ethereum, alloy_primitives::Address::repeat_byte(0x42));
        TokenAmount::new(token, U256::from(wei))
    }

    #[test]
    fn test_percent_fee_floor() {
        // 0.3% of 1000 is exactly 3.
        let fee = FeeInfo { percent: FeePercent::from_ppm(3000).unwrap(), fixed: None };
        let outcome = apply_fees(&input(1000), &fee).unwrap();
        assert_eq!(outcome.percent_fee_wei, U256::from(3u64));
        assert_eq!(outcome.adjusted.get_wei(), U256::from(997u64));

        // 0.3% of 100 floors to 0.
        let outcome = apply_fees(&input(100), &fee).unwrap();
        assert_eq!(outcome.percent_fee_wei, U256::ZERO);
        assert_eq!(outcome.adjusted.get_wei(), U256::from(100u64));
    }

    #[test]
    fn test_fixed_fee_in_input_token_is_deducted() {
        let amount = input(1000);
        let fee = FeeInfo {
            percent: FeePercent::ZERO,
            fixed: Some(FixedFee { amount: U256::from(40u64), token: amount.get_token().clone() }),
        };
        let outcome = apply_fees(&amount, &fee).unwrap();
        assert_eq!(outcome.fixed_fee_wei, U256::from(40u64));
        assert_eq!(outcome.adjusted.get_wei(), U256::from(960u64));
    }

    #[test]
    fn test_fixed_fee_in_other_token_is_not_deducted() {
        let amount = input(1000);
        let fee = FeeInfo {
            percent: FeePercent::ZERO,
            fixed: Some(FixedFee {
                amount: U256::from(40u64),
                token: Token::native(BlockchainName::Ethereum),
            }),
        };
        let outcome = apply_fees(&amount, &fee).unwrap();
        assert_eq!(outcome.fixed_fee_wei, U256::ZERO);
        assert_eq!(outcome.adjusted.get_wei(), U256::from(1000u64));
    }

    #[test]
    fn test_percent_then_fixed_order() {
        // 10% of 1000 = 100, then fixed 100 leaves 800. Deducting the fixed
        // fee first would leave 810.
        let amount = input(1000);
        let fee = FeeInfo {
            percent: FeePercent::from_ppm(100_000).unwrap(),
            fixed: Some(FixedFee { amount: U256::from(100u64), token: amount.get_token().clone() }),
        };
        let outcome = apply_fees(&amount, &fee).unwrap();
        assert_eq!(outcome.adjusted.get_wei(), U256::from(800u64));
    }

    #[test]
    fn test_exhausted_amount_is_too_low() {
        let amount = input(50);
        let fee = FeeInfo {
            percent: FeePercent::ZERO,
            fixed: Some(FixedFee { amount: U256::from(80u64), token: amount.get_token().clone() }),
        };
        assert_eq!(apply_fees(&amount, &fee), Err(SwapError::AmountTooLow));

        // Exactly consumed is still too low, never negative.
        let fee = FeeInfo {
            percent: FeePercent::ZERO,
            fixed: Some(FixedFee { amount: U256::from(50u64), token: amount.get_token().clone() }),
        };
        assert_eq!(apply_fees(&amount, &fee), Err(SwapError::AmountTooLow));
    }

    #[test]
    fn test_zero_fee_passthrough() {
        let amount = input(1234);
        let outcome = apply_fees(&amount, &FeeInfo::zero()).unwrap();
        assert_eq!(outcome.adjusted, amount);
        assert_eq!(outcome.percent_fee_wei, U256::ZERO);
        assert_eq!(outcome.fixed_fee_wei, U256::ZERO);
    }

    #[test]
    fn test_fee_percent_bounds() {
        assert!(FeePercent::from_ppm(999_999).is_ok());
        assert!(FeePercent::from_ppm(1_000_000).is_err());
        assert!(FeePercent::from_fraction(0.003).is_ok());
        assert_eq!(FeePercent::from_fraction(0.003).unwrap().as_ppm(), 3000);
        assert!(FeePercent::from_fraction(1.0).is_err());
        assert!(FeePercent::from_fraction(-0.1).is_err());
    }
}
