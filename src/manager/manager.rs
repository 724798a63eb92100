use crate::config::AggregatorConfig;
use crate::errors::SwapError;
use crate::fees::{FeeInfo, FeePercent, apply_fees};
use crate::manager::request::{SwapOptions, SwapRequest};
use crate::manager::results::{CalculationResult, Calculations};
use crate::providers::{
    GasCalculation, LiFiProvider, ProviderKind, ProviderRegistry, ProviderWrapper, Quote,
    QuoteContext, SymbiosisProvider,
};
use crate::tokens::{Token, TokenAmount};
use crate::trade::Trade;
use dashmap::DashSet;
use eyre::Result;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Missing estimates rank behind any concrete estimate.
fn gas_rank(trade: &Trade) -> u64 {
    trade.get_estimated_gas().unwrap_or(u64::MAX)
}

/// Fans one request out to every eligible provider and ranks the answers.
///
/// The registry is fixed at construction; the only runtime mutation is the
/// enable/disable set. The manager never mutates request state, so one
/// instance serves concurrent calculations.
pub struct CalculationManager {
    registry: ProviderRegistry,
    config: AggregatorConfig,
    platform_fee: FeeInfo,
    providers_disabled: DashSet<ProviderKind>,
}

impl CalculationManager {
    pub fn new(registry: ProviderRegistry, config: AggregatorConfig) -> Result<CalculationManager> {
        let platform_fee = FeeInfo {
            percent: FeePercent::from_fraction(config.platform_fee_percent)?,
            fixed: config.platform_fixed_fee.clone(),
        };
        info!(providers = registry.len(), "initializing calculation manager");
        Ok(CalculationManager { registry, config, platform_fee, providers_disabled: DashSet::new() })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn get_config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn enable_provider(&self, kind: ProviderKind) {
        self.providers_disabled.remove(&kind);
    }

    pub fn disable_provider(&self, kind: ProviderKind) {
        self.providers_disabled.insert(kind);
    }

    pub fn is_provider_enabled(&self, kind: ProviderKind) -> bool {
        !self.providers_disabled.contains(&kind)
    }

    /// Asks a single provider, regardless of how it would rank. Faults are
    /// folded into the result instead of bubbling, so callers always get the
    /// provider's entry back.
    pub async fn calculate(&self, kind: ProviderKind, request: &SwapRequest) -> CalculationResult {
        let Some(provider) = self.registry.get(kind) else {
            return CalculationResult::error(kind, SwapError::unavailable(format!("{kind} is not registered")));
        };
        if !self.is_provider_enabled(kind) {
            return CalculationResult::error(kind, SwapError::unavailable(format!("{kind} is disabled")));
        }
        match self.quote_one(provider, request).await {
            Ok(trade) => CalculationResult::trade(kind, trade),
            Err(error) => {
                warn!(provider = %kind, %error, "provider failed to quote");
                CalculationResult::error(kind, error)
            }
        }
    }

    /// Quotes every enabled provider that supports the pair and ranks the
    /// results. An `Err` means the whole calculation was impossible; per
    /// provider failures stay inside the returned `Calculations`.
    pub async fn calculate_best(&self, request: &SwapRequest) -> Result<Calculations, SwapError> {
        self.calculate_best_with_cancel(request, CancellationToken::new()).await
    }

    /// Same as [`calculate_best`](Self::calculate_best), aborting with
    /// `SwapError::Cancelled` as soon as `cancel` fires. A cancelled
    /// calculation never returns partial results.
    pub async fn calculate_best_with_cancel(
        &self,
        request: &SwapRequest,
        cancel: CancellationToken,
    ) -> Result<Calculations, SwapError> {
        self.validate(request)?;
        let (input, ctx) = self.prepare(request)?;

        let to_token = request.get_to_token();
        let eligible: Vec<&ProviderWrapper> = self
            .registry
            .all()
            .iter()
            .filter(|p| self.is_provider_enabled(p.kind()))
            .filter(|p| p.supports(input.get_token(), to_token))
            .collect();
        if eligible.is_empty() {
            return Err(SwapError::NotSupportedTokens);
        }

        debug!(providers = eligible.len(), input = %input, "starting quote fan-out");
        let quotes = join_all(eligible.iter().map(|provider| self.timed_quote(provider, &input, to_token, &ctx)));
        let settled = tokio::select! {
            settled = quotes => settled,
            _ = cancel.cancelled() => {
                info!("calculation cancelled by caller");
                return Err(SwapError::Cancelled);
            }
        };

        let mut successes: Vec<(usize, Trade)> = Vec::new();
        let mut failures: Vec<CalculationResult> = Vec::new();
        for (priority, (provider, result)) in eligible.iter().zip(settled).enumerate() {
            match result {
                Ok(quote) => {
                    let trade = Trade::new(provider.kind(), request.get_from().clone(), input.clone(), quote, &ctx);
                    successes.push((priority, trade));
                }
                Err(error) => {
                    warn!(provider = %provider.kind(), %error, "provider failed to quote");
                    failures.push(CalculationResult::error(provider.kind(), error));
                }
            }
        }

        // Highest output wins; gas, then registration order break ties.
        successes.sort_by(|(priority_a, a), (priority_b, b)| {
            b.get_to()
                .get_wei()
                .cmp(&a.get_to().get_wei())
                .then_with(|| gas_rank(a).cmp(&gas_rank(b)))
                .then_with(|| priority_a.cmp(priority_b))
        });
        info!(successes = successes.len(), failures = failures.len(), "quote fan-out finished");

        let results = successes
            .into_iter()
            .map(|(_, trade)| CalculationResult::trade(trade.get_provider(), trade))
            .chain(failures)
            .collect();
        Ok(Calculations::new(results))
    }

    /// Rejections that no provider can fix: swapping a token into itself and
    /// destinations without a numeric chain id.
    fn validate(&self, request: &SwapRequest) -> Result<(), SwapError> {
        if request.get_from().get_token() == request.get_to_token() {
            return Err(SwapError::NotSupportedTokens);
        }
        if request.to_chain().chain_id().as_u64().is_none() {
            return Err(SwapError::NotSupportedTokens);
        }
        Ok(())
    }

    /// Charges the platform fee once and freezes the shared quote context.
    fn prepare(&self, request: &SwapRequest) -> Result<(TokenAmount, QuoteContext), SwapError> {
        let options = request.get_options();
        let fee_info = if options.use_fee_proxy() { self.platform_fee.clone() } else { FeeInfo::zero() };
        let outcome = apply_fees(request.get_from(), &fee_info)?;
        let ctx = QuoteContext {
            slippage_ppm: options.slippage_ppm(),
            deadline_minutes: options.deadline_minutes(),
            receiver: options.receiver(),
            fee_info,
            gas_calculation: self.effective_gas_calculation(options),
        };
        Ok((outcome.adjusted, ctx))
    }

    /// The config switch is an operator override: `Disabled` on either side
    /// disables estimation for the request.
    fn effective_gas_calculation(&self, options: &SwapOptions) -> GasCalculation {
        if self.config.gas_calculation == GasCalculation::Disabled
            || options.gas_calculation() == GasCalculation::Disabled
        {
            GasCalculation::Disabled
        } else {
            GasCalculation::Enabled
        }
    }

    async fn quote_one(&self, provider: &ProviderWrapper, request: &SwapRequest) -> Result<Trade, SwapError> {
        self.validate(request)?;
        let (input, ctx) = self.prepare(request)?;
        if !provider.supports(input.get_token(), request.get_to_token()) {
            return Err(SwapError::NotSupportedTokens);
        }
        let quote = self.timed_quote(provider, &input, request.get_to_token(), &ctx).await?;
        Ok(Trade::new(provider.kind(), request.get_from().clone(), input, quote, &ctx))
    }

    /// One provider call capped by the configured timeout. An elapsed timer
    /// reads as the provider being unavailable, not as a calculation fault.
    async fn timed_quote(
        &self,
        provider: &ProviderWrapper,
        input: &TokenAmount,
        to_token: &Token,
        ctx: &QuoteContext,
    ) -> Result<Quote, SwapError> {
        let timeout = self.config.provider_timeout();
        match tokio::time::timeout(timeout, provider.quote(input, to_token, ctx)).await {
            Ok(result) => result,
            Err(_) => Err(SwapError::unavailable(format!("no response within {}s", timeout.as_secs()))),
        }
    }
}

/// Builder for CalculationManager to make creation more ergonomic. Without
/// explicit providers it wires up the production adapters from the config's
/// endpoints.
pub struct CalculationManagerBuilder {
    config: Option<AggregatorConfig>,
    providers: Vec<ProviderWrapper>,
}

impl CalculationManagerBuilder {
    pub fn new() -> Self {
        Self { config: None, providers: Vec::new() }
    }

    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<ProviderWrapper>) -> Self {
        self.providers.push(provider.into());
        self
    }

    pub fn build(self) -> Result<CalculationManager> {
        let config = self.config.unwrap_or_else(|| AggregatorConfig::from_env().unwrap_or_default());

        let mut registry = ProviderRegistry::new();
        if self.providers.is_empty() {
            registry.register(SymbiosisProvider::new(config.symbiosis_url()?, config.provider_timeout())?);
            registry.register(LiFiProvider::new(config.lifi_url()?, config.provider_timeout())?);
        } else {
            for provider in self.providers {
                registry.register(provider);
            }
        }

        CalculationManager::new(registry, config)
    }
}

impl Default for CalculationManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
