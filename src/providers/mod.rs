pub mod lifi;
pub mod mock_provider;
pub mod provider;
pub mod quote;
pub mod symbiosis;

pub use lifi::LiFiProvider;
pub use mock_provider::MockProvider;
pub use provider::{ProviderKind, ProviderRegistry, ProviderWrapper, SwapCall, TradeProvider};
pub use quote::{GasCalculation, Quote, QuoteContext, RouteHop};
pub use symbiosis::SymbiosisProvider;
