use crate::errors::{SwapError, most_informative};
use crate::providers::ProviderKind;
use crate::trade::Trade;
use serde::{Deserialize, Serialize};

/// What one provider answered: a priced trade or the error its adapter
/// classified. Exactly one of the two is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    provider: ProviderKind,
    trade: Option<Trade>,
    error: Option<SwapError>,
}

impl CalculationResult {
    pub fn trade(provider: ProviderKind, trade: Trade) -> CalculationResult {
        CalculationResult { provider, trade: Some(trade), error: None }
    }

    pub fn error(provider: ProviderKind, error: SwapError) -> CalculationResult {
        CalculationResult { provider, trade: None, error: Some(error) }
    }

    pub fn get_provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn get_trade(&self) -> Option<&Trade> {
        self.trade.as_ref()
    }

    pub fn get_error(&self) -> Option<&SwapError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.trade.is_some()
    }
}

/// Ranked outcome of a fan-out: successes first, best quote at index zero,
/// failures after them in provider priority order.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Calculations {
    results: Vec<CalculationResult>,
}

impl Calculations {
    pub(crate) fn new(results: Vec<CalculationResult>) -> Calculations {
        Calculations { results }
    }

    pub fn results(&self) -> &[CalculationResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The winning trade, when any provider succeeded.
    pub fn best(&self) -> Option<&Trade> {
        self.results.iter().find_map(|r| r.get_trade())
    }

    /// The single error worth surfacing when nothing succeeded: threshold
    /// errors beat unavailability, the least demanding threshold wins.
    pub fn best_error(&self) -> Option<SwapError> {
        let errors: Vec<SwapError> = self.results.iter().filter_map(|r| r.get_error().cloned()).collect();
        most_informative(&errors)
    }
}
