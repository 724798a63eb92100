use crate::chains::{BlockchainName, ChainId};
use crate::errors::{SwapError, threshold_after_last_dollar};
use crate::providers::provider::{ProviderKind, SwapCall, TradeProvider};
use crate::providers::quote::{GasCalculation, Quote, QuoteContext, RouteHop};
use crate::tokens::{PPM, Token, TokenAmount};
use crate::trade::Trade;
use alloy_primitives::{Address, Bytes, U256, address};
use async_trait::async_trait;
use eyre::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// EVM networks the LiFi router aggregates bridges for.
const SUPPORTED: [BlockchainName; 16] = [
    BlockchainName::Ethereum,
    BlockchainName::BinanceSmartChain,
    BlockchainName::Polygon,
    BlockchainName::PolygonZkevm,
    BlockchainName::Avalanche,
    BlockchainName::Moonriver,
    BlockchainName::Moonbeam,
    BlockchainName::Fantom,
    BlockchainName::Arbitrum,
    BlockchainName::Optimism,
    BlockchainName::Gnosis,
    BlockchainName::Fuse,
    BlockchainName::ZkSync,
    BlockchainName::Linea,
    BlockchainName::Base,
    BlockchainName::Aurora,
];

/// LiFi rejection bodies carry a code plus a free-form message. 1002 is the
/// stable "no route exists" code; amount bounds only show up as tool error
/// markers inside the message.
const CODE_NO_QUOTE: i32 = 1002;
const MARKER_AMOUNT_TOO_LOW: &str = "AMOUNT_TOO_LOW";
const MARKER_FEES_EXCEED_AMOUNT: &str = "FEES_HIGHER_THAN_AMOUNT";
const NO_QUOTE_MESSAGE: &str = "No available quotes";

/// Stand-in sender for quote requests made before any wallet is known.
const PLACEHOLDER_SENDER: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiToken {
    chain_id: u64,
    /// The zero address marks the chain's native asset.
    address: Address,
    decimals: u8,
    #[serde(default)]
    symbol: Option<String>,
}

impl ApiToken {
    fn to_token(&self) -> Option<Token> {
        let blockchain = BlockchainName::from_chain_id(self.chain_id)?;
        Some(Token::new_with_data(
            blockchain,
            self.address,
            self.symbol.clone(),
            None,
            Some(self.decimals),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAction {
    to_token: ApiToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGasCost {
    /// Gas units, as a decimal string.
    estimate: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEstimate {
    /// Wei of the destination token, as a decimal string.
    to_amount: String,
    #[serde(default, rename = "fromAmountUSD")]
    from_amount_usd: Option<String>,
    #[serde(default, rename = "toAmountUSD")]
    to_amount_usd: Option<String>,
    #[serde(default)]
    gas_costs: Vec<ApiGasCost>,
}

/// One sub-swap or bridge leg inside the aggregated step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiIncludedStep {
    tool: String,
    action: ApiAction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTransactionRequest {
    to: Address,
    data: Bytes,
    /// Wei, as a 0x-prefixed hex string.
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    tool: String,
    estimate: ApiEstimate,
    #[serde(default)]
    included_steps: Vec<ApiIncludedStep>,
    #[serde(default)]
    transaction_request: Option<ApiTransactionRequest>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
}

/// Bridge aggregation through the LiFi quote API. One GET both prices the
/// transfer and returns the transaction; the bridge tool of every included
/// step stays visible on the route.
pub struct LiFiProvider {
    client: reqwest::Client,
    quote_url: Url,
}

impl LiFiProvider {
    pub fn new(api_url: Url, timeout: Duration) -> Result<LiFiProvider> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let quote_url = api_url.join("v1/quote")?;
        Ok(LiFiProvider { client, quote_url })
    }

    fn quote_query(
        input: &TokenAmount,
        to_token: &Token,
        sender: Address,
        receiver: Address,
        slippage_ppm: u32,
    ) -> Result<Vec<(&'static str, String)>, SwapError> {
        let ChainId::Id(from_chain) = input.get_token().chain_id() else {
            return Err(SwapError::NotSupportedTokens);
        };
        let ChainId::Id(to_chain) = to_token.chain_id() else {
            return Err(SwapError::NotSupportedTokens);
        };
        Ok(vec![
            ("fromChain", from_chain.to_string()),
            ("toChain", to_chain.to_string()),
            ("fromToken", input.get_token().get_address().to_string()),
            ("toToken", to_token.get_address().to_string()),
            ("fromAmount", input.get_wei().to_string()),
            ("fromAddress", sender.to_string()),
            ("toAddress", receiver.to_string()),
            ("slippage", (slippage_ppm as f64 / PPM as f64).to_string()),
        ])
    }

    async fn get_quote(&self, query: &[(&'static str, String)]) -> Result<QuoteResponse, SwapError> {
        let response = self
            .client
            .get(self.quote_url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| SwapError::unavailable(format!("lifi request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.json::<ApiError>().await.unwrap_or_default();
            debug!(status = status.as_u16(), ?error, "lifi rejected the transfer");
            return Err(classify_api_error(error));
        }

        response
            .json::<QuoteResponse>()
            .await
            .map_err(|e| SwapError::unknown(format!("malformed lifi response: {e}")))
    }

    fn parse_quote(
        input: &TokenAmount,
        to_token: &Token,
        response: &QuoteResponse,
        gas_calculation: GasCalculation,
    ) -> Result<Quote, SwapError> {
        let amount_out = U256::from_str_radix(&response.estimate.to_amount, 10)
            .map_err(|e| SwapError::unknown(format!("bad lifi output amount: {e}")))?;
        let estimated_gas = match gas_calculation {
            GasCalculation::Enabled => gas_units(&response.estimate),
            GasCalculation::Disabled => None,
        };
        Ok(Quote {
            output: TokenAmount::new(to_token.clone(), amount_out),
            route: route_from_steps(input.get_token(), to_token, &response.tool, &response.included_steps),
            price_impact: price_impact_percent(&response.estimate),
            estimated_gas,
        })
    }
}

fn classify_api_error(error: ApiError) -> SwapError {
    let message = error.message.unwrap_or_default();
    if error.code == Some(CODE_NO_QUOTE) || message.contains(NO_QUOTE_MESSAGE) {
        return SwapError::NotSupportedTokens;
    }
    if message.contains(MARKER_FEES_EXCEED_AMOUNT) {
        return SwapError::AmountTooLow;
    }
    if message.contains(MARKER_AMOUNT_TOO_LOW) {
        return match threshold_after_last_dollar(&message) {
            Some(amount) => SwapError::min_amount(amount, "USD"),
            None => SwapError::unknown(message),
        };
    }
    if message.is_empty() {
        return SwapError::unavailable("lifi api error");
    }
    SwapError::unknown(message)
}

/// Sum of per-leg gas estimates, when every leg reports one.
fn gas_units(estimate: &ApiEstimate) -> Option<u64> {
    if estimate.gas_costs.is_empty() {
        return None;
    }
    estimate
        .gas_costs
        .iter()
        .map(|cost| cost.estimate.parse::<u64>().ok())
        .try_fold(0u64, |total, gas| Some(total.saturating_add(gas?)))
}

/// Nominal-vs-quoted slippage in percent, from the USD legs of the estimate.
fn price_impact_percent(estimate: &ApiEstimate) -> Option<f64> {
    let from_usd = estimate.from_amount_usd.as_deref()?.parse::<f64>().ok()?;
    let to_usd = estimate.to_amount_usd.as_deref()?.parse::<f64>().ok()?;
    if from_usd <= 0.0 {
        return None;
    }
    Some((from_usd - to_usd) / from_usd * 100.0)
}

/// Rebuilds the route from the included steps: the request tokens bracket it
/// and each leg's output token lands a hop carrying that leg's bridge or DEX
/// tool, so transfer-only legs stay attributable.
fn route_from_steps(
    from: &Token,
    to: &Token,
    tool: &str,
    steps: &[ApiIncludedStep],
) -> Vec<RouteHop> {
    let mut hops = vec![RouteHop::new(from.clone(), tool)];
    for step in steps {
        let Some(token) = step.action.to_token.to_token() else {
            continue;
        };
        if hops.last().is_some_and(|hop| hop.token == token) {
            continue;
        }
        hops.push(RouteHop::new(token, step.tool.clone()));
    }
    if hops.last().is_some_and(|hop| hop.token != *to) {
        hops.push(RouteHop::new(to.clone(), tool));
    }
    hops
}

#[async_trait]
impl TradeProvider for LiFiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LiFi
    }

    fn supports(&self, from: &Token, to: &Token) -> bool {
        SUPPORTED.contains(&from.get_blockchain()) && SUPPORTED.contains(&to.get_blockchain())
    }

    async fn quote(
        &self,
        input: &TokenAmount,
        to_token: &Token,
        ctx: &QuoteContext,
    ) -> Result<Quote, SwapError> {
        if !self.supports(input.get_token(), to_token) {
            return Err(SwapError::NotSupportedTokens);
        }
        let sender = PLACEHOLDER_SENDER;
        let receiver = ctx.receiver.unwrap_or(sender);
        let query = Self::quote_query(input, to_token, sender, receiver, ctx.slippage_ppm)?;
        let response = self.get_quote(&query).await?;
        Self::parse_quote(input, to_token, &response, ctx.gas_calculation)
    }

    async fn build_swap_call(
        &self,
        trade: &Trade,
        sender: Address,
        receiver: Address,
    ) -> Result<SwapCall, SwapError> {
        let query = Self::quote_query(
            trade.get_swap_input(),
            trade.get_to().get_token(),
            sender,
            receiver,
            trade.get_slippage_ppm(),
        )?;
        let response = self.get_quote(&query).await?;
        let tx = response
            .transaction_request
            .ok_or_else(|| SwapError::unavailable("lifi response carries no transaction"))?;
        let value = match tx.value.as_deref() {
            Some(value) => U256::from_str_radix(value.trim_start_matches("0x"), 16)
                .map_err(|e| SwapError::unknown(format!("bad lifi tx value: {e}")))?,
            None => U256::ZERO,
        };
        Ok(SwapCall {
            call: crate::execution::CallDescriptor { to: tx.to, data: tx.data, value },
            needs_native_unwrap: false,
        })
    }
}
