use crate::chains::{BlockchainName, ChainId, NATIVE};
use crate::errors::{SwapError, threshold_after_last_dollar};
use crate::providers::provider::{ProviderKind, SwapCall, TradeProvider};
use crate::providers::quote::{Quote, QuoteContext, RouteHop};
use crate::tokens::{Token, TokenAmount};
use crate::trade::{Trade, epoch_now};
use alloy_primitives::{Address, Bytes, U256, address};
use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Networks the Symbiosis routing API covers.
const SUPPORTED: [BlockchainName; 13] = [
    BlockchainName::Ethereum,
    BlockchainName::BinanceSmartChain,
    BlockchainName::Polygon,
    BlockchainName::Avalanche,
    BlockchainName::Telos,
    BlockchainName::Boba,
    BlockchainName::ZkSync,
    BlockchainName::Arbitrum,
    BlockchainName::Optimism,
    BlockchainName::Linea,
    BlockchainName::Base,
    BlockchainName::Mantle,
    BlockchainName::Bitcoin,
];

/// Symbiosis routes every swap through USDC, so min/max thresholds in its
/// error messages are USDC amounts.
const TRANSIT_SYMBOL: &str = "USDC";

const CODE_AMOUNT_TOO_LOW: i32 = 2;
const CODE_AMOUNT_LESS_THAN_FEE: i32 = 3;
const CODE_AMOUNT_TOO_HIGH: i32 = 4;

const PROVIDER_LABEL: &str = "SYMBIOSIS";

/// Stand-in sender for quote requests made before any wallet is known.
const PLACEHOLDER_SENDER: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiToken {
    chain_id: u64,
    /// Empty string marks the chain's native asset.
    address: String,
    decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
}

impl ApiToken {
    fn from_token(token: &Token) -> Option<ApiToken> {
        let ChainId::Id(chain_id) = token.chain_id() else { return None };
        let address =
            if token.is_native() { String::new() } else { token.get_address().to_string() };
        Some(ApiToken { chain_id, address, decimals: token.get_decimals(), symbol: Some(token.get_symbol()) })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTokenAmount {
    #[serde(flatten)]
    token: ApiToken,
    /// Wei, as a decimal string.
    amount: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SwappingParams {
    token_amount_in: ApiTokenAmount,
    token_out: ApiToken,
    from: String,
    to: String,
    revertable_address: String,
    /// Basis points.
    slippage: u32,
    /// Unix timestamp.
    deadline: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAmountOut {
    amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRouteToken {
    chain_id: u64,
    #[serde(default)]
    address: String,
    decimals: u8,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTransaction {
    to: Address,
    data: Bytes,
    /// Wei, as a decimal string. Absent for token-input swaps.
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    token_amount_out: ApiAmountOut,
    #[serde(default)]
    route: Vec<ApiRouteToken>,
    #[serde(default)]
    price_impact: Option<String>,
    #[serde(default)]
    tx: Option<ApiTransaction>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
}

/// Cross-chain swaps through the Symbiosis routing API. Every request is a
/// single POST; the same endpoint both prices a swap and returns the
/// transaction to submit.
pub struct SymbiosisProvider {
    client: reqwest::Client,
    swap_url: Url,
}

impl SymbiosisProvider {
    pub fn new(api_url: Url, timeout: Duration) -> Result<SymbiosisProvider> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let swap_url = api_url.join("v1/swap")?;
        Ok(SymbiosisProvider { client, swap_url })
    }

    fn swapping_params(
        input: &TokenAmount,
        to_token: &Token,
        sender: Address,
        receiver: Address,
        slippage_ppm: u32,
        deadline_minutes: u64,
    ) -> Result<SwappingParams, SwapError> {
        let token_in =
            ApiToken::from_token(input.get_token()).ok_or(SwapError::NotSupportedTokens)?;
        let token_out = ApiToken::from_token(to_token).ok_or(SwapError::NotSupportedTokens)?;
        Ok(SwappingParams {
            token_amount_in: ApiTokenAmount { token: token_in, amount: input.get_wei().to_string() },
            token_out,
            from: sender.to_string(),
            to: receiver.to_string(),
            revertable_address: sender.to_string(),
            slippage: slippage_ppm / 100,
            deadline: epoch_now() + 60 * deadline_minutes,
        })
    }

    async fn post_swap(&self, params: &SwappingParams) -> Result<SwapResponse, SwapError> {
        let response = self
            .client
            .post(self.swap_url.clone())
            .json(params)
            .send()
            .await
            .map_err(|e| SwapError::unavailable(format!("symbiosis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.json::<ApiError>().await.unwrap_or_default();
            debug!(status = status.as_u16(), ?error, "symbiosis rejected the swap");
            return Err(classify_api_error(error));
        }

        response
            .json::<SwapResponse>()
            .await
            .map_err(|e| SwapError::unknown(format!("malformed symbiosis response: {e}")))
    }

    fn parse_quote(
        input: &TokenAmount,
        to_token: &Token,
        response: &SwapResponse,
    ) -> Result<Quote, SwapError> {
        let amount_out = U256::from_str_radix(&response.token_amount_out.amount, 10)
            .map_err(|e| SwapError::unknown(format!("bad symbiosis output amount: {e}")))?;
        let price_impact = response.price_impact.as_deref().and_then(|s| s.parse::<f64>().ok());
        Ok(Quote {
            output: TokenAmount::new(to_token.clone(), amount_out),
            route: route_from_tokens(input.get_token(), to_token, &response.route),
            price_impact,
            estimated_gas: None,
        })
    }
}

/// Maps a rejection body onto the error taxonomy. Thresholds ride on the
/// message text after the last dollar sign.
fn classify_api_error(error: ApiError) -> SwapError {
    let message = error.message.unwrap_or_default();
    match error.code {
        Some(CODE_AMOUNT_LESS_THAN_FEE) => SwapError::AmountTooLow,
        Some(CODE_AMOUNT_TOO_LOW) => match threshold_after_last_dollar(&message) {
            Some(amount) => SwapError::min_amount(amount, TRANSIT_SYMBOL),
            None => SwapError::unknown(message),
        },
        Some(CODE_AMOUNT_TOO_HIGH) => match threshold_after_last_dollar(&message) {
            Some(amount) => SwapError::max_amount(amount, TRANSIT_SYMBOL),
            None => SwapError::unknown(message),
        },
        _ if message.is_empty() => SwapError::unavailable("symbiosis api error"),
        _ => SwapError::unknown(message),
    }
}

/// Rebuilds the visible route from the raw token list: the request tokens
/// bracket it, consecutive duplicates collapse, unknown networks are skipped.
fn route_from_tokens(from: &Token, to: &Token, route: &[ApiRouteToken]) -> Vec<RouteHop> {
    let mut hops = vec![RouteHop::new(from.clone(), PROVIDER_LABEL)];
    for entry in route {
        let Some(blockchain) = BlockchainName::from_chain_id(entry.chain_id) else {
            continue;
        };
        let address = if entry.address.is_empty() {
            NATIVE
        } else {
            match entry.address.parse::<Address>() {
                Ok(address) => address,
                Err(_) => continue,
            }
        };
        let token =
            Token::new_with_data(blockchain, address, entry.symbol.clone(), None, Some(entry.decimals));
        if hops.last().is_some_and(|hop| hop.token == token) {
            continue;
        }
        hops.push(RouteHop::new(token, PROVIDER_LABEL));
    }
    if hops.last().is_some_and(|hop| hop.token != *to) {
        hops.push(RouteHop::new(to.clone(), PROVIDER_LABEL));
    }
    hops
}

#[async_trait]
impl TradeProvider for SymbiosisProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Symbiosis
    }

    fn supports(&self, from: &Token, to: &Token) -> bool {
        // Bitcoin works as a destination only.
        if from.get_blockchain() == BlockchainName::Bitcoin {
            return false;
        }
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
        let params = Self::swapping_params(
            input,
            to_token,
            sender,
            receiver,
            ctx.slippage_ppm,
            ctx.deadline_minutes,
        )?;
        let response = self.post_swap(&params).await?;
        Self::parse_quote(input, to_token, &response)
    }

    async fn build_swap_call(
        &self,
        trade: &Trade,
        sender: Address,
        receiver: Address,
    ) -> Result<SwapCall, SwapError> {
        let params = Self::swapping_params(
            trade.get_swap_input(),
            trade.get_to().get_token(),
            sender,
            receiver,
            trade.get_slippage_ppm(),
            trade.deadline_minutes(),
        )?;
        let response = self.post_swap(&params).await?;
        let tx = response
            .tx
            .ok_or_else(|| SwapError::unavailable("symbiosis response carries no transaction"))?;
        let value = match tx.value.as_deref() {
            Some(value) => U256::from_str_radix(value, 10)
                .map_err(|e| SwapError::unknown(format!("bad symbiosis tx value: {e}")))?,
            None => U256::ZERO,
        };
        Ok(SwapCall {
            call: crate::execution::CallDescriptor { to: tx.to, data: tx.data, value },
            needs_native_unwrap: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SymbiosisProvider {
        let api_url = Url::parse("https://api.symbiosis.finance/crosschain/").unwrap();
        SymbiosisProvider::new(api_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_join() {
        let provider = provider();
        assert_eq!(provider.swap_url.as_str(), "https://api.symbiosis.finance/crosschain/v1/swap");
    }

    #[test]
    fn test_supports_rejects_bitcoin_source() {
        let provider = provider();
        let btc = Token::native(BlockchainName::Bitcoin);
        let usdc = Token::repeat_byte(BlockchainName::Ethereum, 0x11);
        assert!(!provider.supports(&btc, &usdc));
        // The reverse direction is allowed.
        assert!(provider.supports(&usdc, &btc));
    }

    #[test]
    fn test_supports_requires_both_chains() {
        let provider = provider();
        let on_cronos = Token::repeat_byte(BlockchainName::Cronos, 0x11);
        let on_base = Token::repeat_byte(BlockchainName::Base, 0x22);
        assert!(!provider.supports(&on_cronos, &on_base));
        assert!(!provider.supports(&on_base, &on_cronos));
        assert!(provider.supports(&on_base, &on_base));
    }

    #[test]
    fn test_swapping_params_wire_shape() {
        let input = TokenAmount::new(
            Token::native(BlockchainName::Ethereum),
            U256::from(1_500_000_000_000_000_000u64),
        );
        let out = Token::repeat_byte(BlockchainName::Polygon, 0x22);
        let params = SymbiosisProvider::swapping_params(
            &input,
            &out,
            PLACEHOLDER_SENDER,
            PLACEHOLDER_SENDER,
            20_000,
            20,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::to_value(&params).unwrap();
        // Native input serializes with an empty address and flattened amount.
        assert_eq!(json["tokenAmountIn"]["chainId"], 1);
        assert_eq!(json["tokenAmountIn"]["address"], "");
        assert_eq!(json["tokenAmountIn"]["amount"], "1500000000000000000");
        assert_eq!(json["tokenOut"]["chainId"], 137);
        // 2% expressed in basis points.
        assert_eq!(json["slippage"], 200);
        assert!(json["deadline"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_classify_amount_errors() {
        let too_low = ApiError {
            code: Some(CODE_AMOUNT_TOO_LOW),
            message: Some("ERROR: transit amount is too low, min is $10.5".to_string()),
        };
        assert_eq!(
            classify_api_error(too_low),
            SwapError::min_amount("10.5", "USDC")
        );

        let too_high = ApiError {
            code: Some(CODE_AMOUNT_TOO_HIGH),
            message: Some("transit amount is too high, max is $10000".to_string()),
        };
        assert_eq!(
            classify_api_error(too_high),
            SwapError::max_amount("10000", "USDC")
        );

        let less_than_fee = ApiError {
            code: Some(CODE_AMOUNT_LESS_THAN_FEE),
            message: Some("amount is less than fee $3".to_string()),
        };
        assert_eq!(classify_api_error(less_than_fee), SwapError::AmountTooLow);

        let opaque = ApiError { code: Some(77), message: Some("pool is paused".to_string()) };
        assert_eq!(classify_api_error(opaque), SwapError::unknown("pool is paused"));

        assert_eq!(
            classify_api_error(ApiError::default()),
            SwapError::unavailable("symbiosis api error")
        );
    }

    #[test]
    fn test_classify_without_threshold_falls_back() {
        let no_dollar = ApiError {
            code: Some(CODE_AMOUNT_TOO_LOW),
            message: Some("amount is too low".to_string()),
        };
        assert_eq!(classify_api_error(no_dollar), SwapError::unknown("amount is too low"));
    }

    #[test]
    fn test_route_from_tokens_brackets_and_dedups() {
        let from = Token::repeat_byte(BlockchainName::Ethereum, 0x11);
        let to = Token::repeat_byte(BlockchainName::Polygon, 0x22);
        let usdc_ethereum = Address::repeat_byte(0x33);
        let usdc_polygon = Address::repeat_byte(0x44);
        let route = vec![
            // Echo of the input token collapses into the bracket.
            ApiRouteToken {
                chain_id: 1,
                address: format!("{:#x}", Address::repeat_byte(0x11)),
                decimals: 18,
                symbol: None,
            },
            ApiRouteToken {
                chain_id: 1,
                address: format!("{usdc_ethereum:#x}"),
                decimals: 6,
                symbol: Some("USDC".to_string()),
            },
            // Unknown network in the middle is skipped.
            ApiRouteToken { chain_id: 999_999, address: String::new(), decimals: 18, symbol: None },
            ApiRouteToken {
                chain_id: 137,
                address: format!("{usdc_polygon:#x}"),
                decimals: 6,
                symbol: Some("USDC".to_string()),
            },
        ];

        let hops = route_from_tokens(&from, &to, &route);
        assert_eq!(hops.len(), 4);
        assert_eq!(hops[0].token, from);
        assert_eq!(hops[1].token.get_address(), usdc_ethereum);
        assert_eq!(hops[2].token.get_address(), usdc_polygon);
        assert_eq!(hops[3].token, to);
        assert!(hops.iter().all(|hop| hop.via == "SYMBIOSIS"));
    }

    #[test]
    fn test_parse_quote_from_response_body() {
        let body = r#"{
            "tokenAmountOut": { "amount": "987654321" },
            "route": [
                { "chainId": 1, "address": "", "decimals": 18, "symbol": "ETH" },
                { "chainId": 137, "address": "0x4444444444444444444444444444444444444444", "decimals": 6, "symbol": "USDC" }
            ],
            "priceImpact": "-0.15",
            "tx": {
                "to": "0x5555555555555555555555555555555555555555",
                "data": "0xdeadbeef",
                "value": "12345"
            }
        }"#;
        let response: SwapResponse = serde_json::from_str(body).unwrap();

        let input = TokenAmount::new(Token::native(BlockchainName::Ethereum), U256::from(1u64));
        let out = Token::repeat_byte(BlockchainName::Polygon, 0x44);
        let quote = SymbiosisProvider::parse_quote(&input, &out, &response).unwrap();

        assert_eq!(quote.output.get_wei(), U256::from(987_654_321u64));
        assert_eq!(quote.price_impact, Some(-0.15));
        assert_eq!(quote.route.first().unwrap().token, input.get_token().clone());
        assert_eq!(quote.route.last().unwrap().token, out);

        let tx = response.tx.unwrap();
        assert_eq!(tx.to, Address::repeat_byte(0x55));
        assert_eq!(tx.data, Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(tx.value.as_deref(), Some("12345"));
    }
}
