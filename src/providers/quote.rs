use crate::fees::FeeInfo;
use crate::tokens::{Token, TokenAmount};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, VariantNames};

/// Whether quotes should carry a gas estimate. Disabling skips estimation
/// entirely, it does not degrade to defaults.
#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, EnumString, VariantNames, Default, Deserialize, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GasCalculation {
    #[default]
    Enabled,
    Disabled,
}

/// One step of a route: the asset held after the step and the venue that
/// produced it. The first hop carries the request's input token, the last
/// one the output token, and every chain change in between stays visible.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteHop {
    pub token: Token,
    pub via: String,
}

impl RouteHop {
    pub fn new(token: Token, via: impl Into<String>) -> RouteHop {
        RouteHop { token, via: via.into() }
    }
}

/// A provider's answer for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub output: TokenAmount,
    pub route: Vec<RouteHop>,
    /// Display-only, as reported by the provider.
    pub price_impact: Option<f64>,
    pub estimated_gas: Option<u64>,
}

/// Per-request inputs the manager resolves once and every adapter shares:
/// the platform fee already charged against the input, the caller's options
/// and the receiver when one is known at quote time.
#[derive(Clone, Debug)]
pub struct QuoteContext {
    pub slippage_ppm: u32,
    pub deadline_minutes: u64,
    pub receiver: Option<Address>,
    pub fee_info: FeeInfo,
    pub gas_calculation: GasCalculation,
}
