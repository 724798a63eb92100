use super::quote::{Quote, QuoteContext};
use crate::errors::SwapError;
use crate::execution::CallDescriptor;
use crate::tokens::{Token, TokenAmount};
use crate::trade::Trade;
use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString, VariantNames};

/// Every venue the aggregator can route through. Declaration order is the
/// priority used to break ranking ties, so reordering variants changes which
/// provider wins an equal quote.
#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, PartialOrd, Ord, EnumString, VariantNames, Default, Deserialize, Serialize, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderKind {
    #[default]
    Symbiosis,
    LiFi,
    DeBridge,
    Across,
}

/// A provider transaction plus what the call builder still has to finish:
/// when the output lands as wrapped native, the unwrap to the receiver gets
/// bundled on top of this call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapCall {
    pub call: CallDescriptor,
    pub needs_native_unwrap: bool,
}

/// Capability interface of a venue adapter. Implementations own their
/// network clients and share nothing with each other.
#[async_trait]
pub trait TradeProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Static capability check, no I/O. `false` keeps the pair out of the
    /// fan-out entirely.
    fn supports(&self, from: &Token, to: &Token) -> bool;

    /// Quotes the post-fee input. Never panics and never lets a raw provider
    /// error escape: every failure maps into `SwapError` here.
    async fn quote(&self, input: &TokenAmount, to_token: &Token, ctx: &QuoteContext) -> Result<Quote, SwapError>;

    /// Re-derives the provider transaction for `trade` at execution time.
    /// Quote-time calldata is never cached.
    async fn build_swap_call(&self, trade: &Trade, sender: Address, receiver: Address) -> Result<SwapCall, SwapError>;
}

pub struct ProviderWrapper {
    pub provider: Arc<dyn TradeProvider>,
}

impl PartialOrd for ProviderWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for ProviderWrapper {}

impl Ord for ProviderWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind().cmp(&other.kind())
    }
}

impl Display for ProviderWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

impl Debug for ProviderWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProviderWrapper({})", self.kind())
    }
}

impl Hash for ProviderWrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state)
    }
}

impl PartialEq for ProviderWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.provider.kind() == other.provider.kind()
    }
}

impl ProviderWrapper {
    pub fn new(provider: Arc<dyn TradeProvider>) -> Self {
        ProviderWrapper { provider }
    }
}

impl Clone for ProviderWrapper {
    fn clone(&self) -> Self {
        Self { provider: self.provider.clone() }
    }
}

impl Deref for ProviderWrapper {
    type Target = dyn TradeProvider;

    fn deref(&self) -> &Self::Target {
        self.provider.deref()
    }
}

impl<T: 'static + TradeProvider> From<T> for ProviderWrapper {
    fn from(provider: T) -> Self {
        Self { provider: Arc::new(provider) }
    }
}

/// The set of registered adapters. Assembled at startup, read-only afterward;
/// insertion order fixes priority for ranking ties.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderWrapper>,
}

impl ProviderRegistry {
    pub fn new() -> ProviderRegistry {
        ProviderRegistry::default()
    }

    /// Registers a provider. A provider of the same kind is replaced in
    /// place so priority does not shift.
    pub fn register(&mut self, provider: impl Into<ProviderWrapper>) {
        let provider = provider.into();
        match self.providers.iter().position(|p| p.kind() == provider.kind()) {
            Some(index) => self.providers[index] = provider,
            None => self.providers.push(provider),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderWrapper> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    /// Position in priority order, lower wins ties.
    pub fn priority(&self, kind: ProviderKind) -> Option<usize> {
        self.providers.iter().position(|p| p.kind() == kind)
    }

    pub fn all(&self) -> &[ProviderWrapper] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
