use crate::chains::BlockchainName;
use crate::providers::GasCalculation;
use crate::tokens::{PPM, Token, TokenAmount};
use alloy_primitives::Address;
use eyre::{Result, bail};

pub const DEFAULT_SLIPPAGE: f64 = 0.02;
pub const DEFAULT_DEADLINE_MINUTES: u64 = 20;

/// Caller-supplied knobs for one calculation. Construction is the only place
/// that faults: malformed options are a programming error, everything later
/// surfaces as a structured `SwapError`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapOptions {
    slippage_ppm: u32,
    deadline_minutes: u64,
    receiver: Option<Address>,
    use_fee_proxy: bool,
    gas_calculation: GasCalculation,
}

impl SwapOptions {
    /// `slippage_fraction` must lie in (0, 1), `deadline_minutes` must be
    /// positive.
    pub fn new(slippage_fraction: f64, deadline_minutes: u64) -> Result<SwapOptions> {
        if !(slippage_fraction > 0.0 && slippage_fraction < 1.0) {
            bail!("slippage tolerance must be within (0, 1), got {slippage_fraction}");
        }
        if deadline_minutes == 0 {
            bail!("deadline must be a positive number of minutes");
        }
        Ok(SwapOptions {
            slippage_ppm: (slippage_fraction * PPM as f64).round() as u32,
            deadline_minutes,
            receiver: None,
            use_fee_proxy: true,
            gas_calculation: GasCalculation::Enabled,
        })
    }

    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_fee_proxy(mut self, use_fee_proxy: bool) -> Self {
        self.use_fee_proxy = use_fee_proxy;
        self
    }

    pub fn with_gas_calculation(mut self, gas_calculation: GasCalculation) -> Self {
        self.gas_calculation = gas_calculation;
        self
    }

    pub fn slippage_ppm(&self) -> u32 {
        self.slippage_ppm
    }

    pub fn deadline_minutes(&self) -> u64 {
        self.deadline_minutes
    }

    pub fn receiver(&self) -> Option<Address> {
        self.receiver
    }

    pub fn use_fee_proxy(&self) -> bool {
        self.use_fee_proxy
    }

    pub fn gas_calculation(&self) -> GasCalculation {
        self.gas_calculation
    }
}

impl Default for SwapOptions {
    fn default() -> Self {
        // The defaults satisfy their own validation.
        SwapOptions::new(DEFAULT_SLIPPAGE, DEFAULT_DEADLINE_MINUTES)
            .expect("default options are valid")
    }
}

/// One calculation request: pay `from`, receive `to_token`.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapRequest {
    from: TokenAmount,
    to_token: Token,
    options: SwapOptions,
}

impl SwapRequest {
    pub fn new(from: TokenAmount, to_token: Token, options: SwapOptions) -> SwapRequest {
        SwapRequest { from, to_token, options }
    }

    pub fn get_from(&self) -> &TokenAmount {
        &self.from
    }

    pub fn get_to_token(&self) -> &Token {
        &self.to_token
    }

    pub fn get_options(&self) -> &SwapOptions {
        &self.options
    }

    pub fn from_chain(&self) -> BlockchainName {
        self.from.get_token().get_blockchain()
    }

    pub fn to_chain(&self) -> BlockchainName {
        self.to_token.get_blockchain()
    }
}
