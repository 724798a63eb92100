use super::provider::{ProviderKind, SwapCall, TradeProvider};
use super::quote::{Quote, QuoteContext, RouteHop};
use crate::errors::SwapError;
use crate::execution::CallDescriptor;
use crate::tokens::{Token, TokenAmount};
use crate::trade::Trade;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::time::Duration;

/// Deterministic provider for tests and benches: fixed output, optional
/// latency, optional scripted failure.
#[derive(Clone)]
pub struct MockProvider {
    pub kind: ProviderKind,
    pub output_wei: U256,
    pub estimated_gas: Option<u64>,
    pub delay: Duration,
    pub failure: Option<SwapError>,
    pub needs_native_unwrap: bool,
    pub router: Address,
    pub supported: bool,
}

impl MockProvider {
    pub fn new(kind: ProviderKind, output_wei: U256) -> MockProvider {
        MockProvider {
            kind,
            output_wei,
            estimated_gas: Some(210_000),
            delay: Duration::ZERO,
            failure: None,
            needs_native_unwrap: false,
            router: Address::repeat_byte(0xed),
            supported: true,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failure(mut self, failure: SwapError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_gas(mut self, estimated_gas: Option<u64>) -> Self {
        self.estimated_gas = estimated_gas;
        self
    }

    pub fn with_native_unwrap(mut self) -> Self {
        self.needs_native_unwrap = true;
        self
    }

    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }
}

#[async_trait]
impl TradeProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn supports(&self, _from: &Token, _to: &Token) -> bool {
        self.supported
    }

    async fn quote(&self, input: &TokenAmount, to_token: &Token, _ctx: &QuoteContext) -> Result<Quote, SwapError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let route = vec![
            RouteHop::new(input.get_token().clone(), self.kind.to_string()),
            RouteHop::new(to_token.clone(), self.kind.to_string()),
        ];
        Ok(Quote {
            output: TokenAmount::new(to_token.clone(), self.output_wei),
            route,
            price_impact: Some(0.1),
            estimated_gas: self.estimated_gas,
        })
    }

    async fn build_swap_call(&self, trade: &Trade, _sender: Address, receiver: Address) -> Result<SwapCall, SwapError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        // Calldata embeds the receiver so tests can assert on it.
        let mut data = Vec::with_capacity(4 + 20);
        data.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
        data.extend_from_slice(receiver.as_slice());
        let input = trade.get_swap_input();
        let value = if input.get_token().is_native() { input.get_wei() } else { U256::ZERO };
        Ok(SwapCall {
            call: CallDescriptor { to: self.router, data: data.into(), value },
            needs_native_unwrap: self.needs_native_unwrap,
        })
    }
}
