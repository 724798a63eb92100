use crate::errors::SwapError;
use crate::execution::{CallDescriptor, Receipt, Wallet};
use crate::fees::FeeInfo;
use crate::providers::{ProviderKind, ProviderRegistry, Quote, QuoteContext, RouteHop};
use crate::tokens::TokenAmount;
use crate::trade::call_builder::finish_swap_call;
use crate::trade::gas::default_gas_limit;
use crate::trade::route::{generate_route_hash, RouteHash};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Seconds since the Unix epoch. Used for trade deadlines.
pub(crate) fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A priced swap returned by a provider, ready to be turned into a
/// transaction. Serializable so it can be cached or shipped to a frontend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    provider: ProviderKind,
    /// What the user pays, before platform fees.
    from: TokenAmount,
    /// What is actually swapped after fees were deducted.
    swap_input: TokenAmount,
    /// Expected output before slippage.
    to: TokenAmount,
    fee_info: FeeInfo,
    route: Vec<RouteHop>,
    route_hash: RouteHash,
    receiver: Option<Address>,
    slippage_ppm: u32,
    deadline_minutes: u64,
    /// Unix timestamp the quote was priced against.
    deadline_at: u64,
    price_impact: Option<f64>,
    estimated_gas: Option<u64>,
}

impl Trade {
    pub fn new(
        provider: ProviderKind,
        from: TokenAmount,
        swap_input: TokenAmount,
        quote: Quote,
        ctx: &QuoteContext,
    ) -> Trade {
        let route_hash = generate_route_hash(&quote.route);
        Trade {
            provider,
            from,
            swap_input,
            to: quote.output,
            fee_info: ctx.fee_info.clone(),
            route: quote.route,
            route_hash,
            receiver: ctx.receiver,
            slippage_ppm: ctx.slippage_ppm,
            deadline_minutes: ctx.deadline_minutes,
            deadline_at: epoch_now() + ctx.deadline_minutes * 60,
            price_impact: quote.price_impact,
            estimated_gas: quote.estimated_gas,
        }
    }

    pub fn get_provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn get_from(&self) -> &TokenAmount {
        &self.from
    }

    pub fn get_swap_input(&self) -> &TokenAmount {
        &self.swap_input
    }

    pub fn get_to(&self) -> &TokenAmount {
        &self.to
    }

    pub fn get_fee_info(&self) -> &FeeInfo {
        &self.fee_info
    }

    pub fn get_route(&self) -> &[RouteHop] {
        &self.route
    }

    pub fn get_route_hash(&self) -> &RouteHash {
        &self.route_hash
    }

    pub fn get_slippage_ppm(&self) -> u32 {
        self.slippage_ppm
    }

    pub fn get_price_impact(&self) -> Option<f64> {
        self.price_impact
    }

    pub fn get_estimated_gas(&self) -> Option<u64> {
        self.estimated_gas
    }

    pub fn deadline_minutes(&self) -> u64 {
        self.deadline_minutes
    }

    pub fn deadline_at(&self) -> u64 {
        self.deadline_at
    }

    /// Worst acceptable output after slippage.
    pub fn min_output_wei(&self) -> U256 {
        self.to.wei_minus_slippage(self.slippage_ppm)
    }

    pub fn min_output(&self) -> TokenAmount {
        self.to.with_wei(self.min_output_wei())
    }

    /// Provider estimate when present, otherwise the hop-count default with
    /// a surcharge when the destination asset is native.
    pub fn gas_limit(&self) -> u64 {
        match self.estimated_gas {
            Some(gas) => gas,
            None => default_gas_limit(
                self.route.len().saturating_sub(1).max(1),
                self.to.get_token().is_native(),
            ),
        }
    }

    /// The token the route exits the source chain through. Only defined when
    /// the route actually moves through an intermediate source-chain token.
    pub fn transit_token(&self) -> Option<&RouteHop> {
        let source_chain = self.from.get_token().get_blockchain();
        let on_source: Vec<&RouteHop> = self
            .route
            .iter()
            .filter(|hop| hop.token.get_blockchain() == source_chain)
            .collect();
        if on_source.len() > 1 {
            on_source.last().copied()
        } else {
            None
        }
    }

    /// Derives the transaction for this trade. The adapter rebuilds its
    /// calldata against the current clock, so a stale `deadline_at` does not
    /// leak into the transaction.
    pub async fn build_call(
        &self,
        registry: &ProviderRegistry,
        sender: Address,
        receiver: Address,
    ) -> Result<CallDescriptor, SwapError> {
        let provider = registry
            .get(self.provider)
            .ok_or_else(|| SwapError::unavailable(format!("{} is not registered", self.provider)))?;
        let swap = provider.build_swap_call(self, sender, receiver).await?;
        Ok(finish_swap_call(swap, self.min_output_wei(), receiver))
    }

    /// Builds and submits the trade through `wallet`. The wallet must be
    /// connected to the source chain; the receiver falls back to the wallet
    /// address on the destination chain.
    pub async fn execute(
        &self,
        registry: &ProviderRegistry,
        wallet: &dyn Wallet,
    ) -> Result<Receipt, SwapError> {
        let from_chain = self.from.get_token().get_blockchain();
        let sender = wallet
            .address(from_chain)
            .ok_or(SwapError::WrongNetwork { required: from_chain })?;

        let to_chain = self.to.get_token().get_blockchain();
        let receiver = match self.receiver {
            Some(receiver) => receiver,
            None => wallet
                .address(to_chain)
                .ok_or(SwapError::WrongNetwork { required: to_chain })?,
        };

        let call = self.build_call(registry, sender, receiver).await?;
        info!(provider = %self.provider, route = %self.route_hash, "submitting swap transaction");
        wallet
            .send_call(from_chain, call)
            .await
            .map_err(|e| SwapError::unknown(format!("transaction submission failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::BlockchainName;
    use crate::execution::MockWallet;
    use crate::providers::{GasCalculation, MockProvider};
    use crate::tokens::Token;
    use crate::trade::call_builder::SwapRouter;
    use alloy_primitives::U256;
    use alloy_sol_types::SolCall;

    fn usdc(blockchain: BlockchainName) -> Token {
        Token::new_with_data(blockchain, Address::repeat_byte(0x11), Some("USDC".to_string()), None, Some(6))
    }

    fn quote_context() -> QuoteContext {
        QuoteContext {
            slippage_ppm: 20_000,
            deadline_minutes: 20,
            receiver: None,
            fee_info: FeeInfo::zero(),
            gas_calculation: GasCalculation::Enabled,
        }
    }

    fn sample_trade() -> Trade {
        let from_token = usdc(BlockchainName::Ethereum);
        let to_token = usdc(BlockchainName::Polygon);
        let from = TokenAmount::new(from_token.clone(), U256::from(1_000_000u64));
        let quote = Quote {
            output: TokenAmount::new(to_token.clone(), U256::from(990_000u64)),
            route: vec![
                RouteHop::new(from_token, "SYMBIOSIS"),
                RouteHop::new(to_token, "SYMBIOSIS"),
            ],
            price_impact: Some(0.1),
            estimated_gas: None,
        };
        Trade::new(ProviderKind::Symbiosis, from.clone(), from, quote, &quote_context())
    }

    #[test]
    fn test_min_output_applies_slippage() {
        let trade = sample_trade();
        // 990_000 at 2% slippage
        assert_eq!(trade.min_output_wei(), U256::from(970_200u64));
    }

    #[test]
    fn test_gas_limit_falls_back_to_hop_default() {
        let trade = sample_trade();
        assert_eq!(trade.gas_limit(), 263_000);
    }

    #[test]
    fn test_transit_token_requires_multiple_source_hops() {
        // Direct source -> destination route has no transit token.
        let trade = sample_trade();
        assert!(trade.transit_token().is_none());

        // A route that swaps into USDT on the source chain before bridging
        // exits through USDT.
        let from_token = usdc(BlockchainName::Ethereum);
        let usdt = Token::new_with_data(
            BlockchainName::Ethereum,
            Address::repeat_byte(0x22),
            Some("USDT".to_string()),
            None,
            Some(6),
        );
        let dest = usdc(BlockchainName::Polygon);
        let from = TokenAmount::new(from_token.clone(), U256::from(1_000_000u64));
        let quote = Quote {
            output: TokenAmount::new(dest.clone(), U256::from(980_000u64)),
            route: vec![
                RouteHop::new(from_token, "UNISWAP_V3"),
                RouteHop::new(usdt, "SYMBIOSIS"),
                RouteHop::new(dest, "SYMBIOSIS"),
            ],
            price_impact: None,
            estimated_gas: None,
        };
        let trade =
            Trade::new(ProviderKind::Symbiosis, from.clone(), from, quote, &quote_context());
        let transit = trade.transit_token().unwrap();
        assert_eq!(transit.token.get_symbol(), "USDT");
    }

    #[test]
    fn test_deadline_from_quote_time() {
        let before = epoch_now();
        let trade = sample_trade();
        assert!(trade.deadline_at() >= before + 20 * 60);
        assert!(trade.deadline_at() <= epoch_now() + 20 * 60);
    }

    #[test]
    fn test_serde_round_trip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, back);
    }

    #[tokio::test]
    async fn test_build_call_passthrough() {
        let mut registry = ProviderRegistry::new();
        registry.register(MockProvider::new(ProviderKind::Symbiosis, U256::from(990_000u64)));
        let trade = sample_trade();

        let call = trade
            .build_call(&registry, Address::repeat_byte(0x01), Address::repeat_byte(0x02))
            .await
            .unwrap();
        assert_eq!(call.to, Address::repeat_byte(0xed));
        // No unwrap requested, so the adapter calldata passes through intact.
        assert_eq!(&call.data[..4], &[0x12, 0x34, 0x56, 0x78]);
    }

    #[tokio::test]
    async fn test_build_call_bundles_native_unwrap() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            MockProvider::new(ProviderKind::Symbiosis, U256::from(990_000u64)).with_native_unwrap(),
        );
        let trade = sample_trade();

        let call = trade
            .build_call(&registry, Address::repeat_byte(0x01), Address::repeat_byte(0x02))
            .await
            .unwrap();
        let decoded = SwapRouter::multicallCall::abi_decode(&call.data).unwrap();
        assert_eq!(decoded.data.len(), 2);
    }

    #[tokio::test]
    async fn test_execute_requires_source_chain_wallet() {
        let mut registry = ProviderRegistry::new();
        registry.register(MockProvider::new(ProviderKind::Symbiosis, U256::from(990_000u64)));
        let trade = sample_trade();

        let wallet = MockWallet::new(Address::repeat_byte(0x05), vec![BlockchainName::Avalanche]);
        let result = trade.execute(&registry, &wallet).await;
        assert_eq!(
            result.unwrap_err(),
            SwapError::WrongNetwork { required: BlockchainName::Ethereum }
        );
    }

    #[tokio::test]
    async fn test_execute_submits_on_source_chain() {
        let mut registry = ProviderRegistry::new();
        registry.register(MockProvider::new(ProviderKind::Symbiosis, U256::from(990_000u64)));
        let trade = sample_trade();

        let wallet = MockWallet::new(
            Address::repeat_byte(0x05),
            vec![BlockchainName::Ethereum, BlockchainName::Polygon],
        );
        let receipt = trade.execute(&registry, &wallet).await.unwrap();
        assert_eq!(receipt.gas_used, 21_000);

        let sent = wallet.sent_calls();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, BlockchainName::Ethereum);
    }
}
