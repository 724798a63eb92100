// Calculation Pipeline Architecture
pub mod chains;    // Domain Layer: chain registry, numeric ids, wrapped natives
pub mod tokens;    // Domain Layer: token identity, exact amount math
pub mod fees;      // Domain Layer: platform fee engine
pub mod errors;    // Domain Layer: provider-agnostic error taxonomy
pub mod providers; // Provider Layer: venue adapters, quotes, registry
pub mod manager;   // Aggregation Layer: concurrent fan-out, ranking
pub mod trade;     // Trade Layer: priced trades, call building, gas
pub mod execution; // Execution Layer: wallet and chain collaborators

// Common utilities and configuration
pub mod config;
pub mod utils;

// Re-export key components from each layer
pub use chains::{BlockchainName, ChainId, ChainType, NATIVE, wrapped_native};
pub use tokens::{PPM, Token, TokenAmount};
pub use fees::{FeeInfo, FeePercent, FixedFee, apply_fees};
pub use errors::SwapError;
pub use providers::{
    GasCalculation, LiFiProvider, MockProvider, ProviderKind, ProviderRegistry, ProviderWrapper,
    Quote, QuoteContext, RouteHop, SwapCall, SymbiosisProvider, TradeProvider,
};
pub use manager::{
    CalculationManager, CalculationManagerBuilder, CalculationResult, Calculations, SwapOptions,
    SwapRequest,
};
pub use trade::{RouteHash, Trade, estimate_gas_limits};
pub use execution::{
    CallDescriptor, ChainReader, MockChainReader, MockTokenResolver, MockWallet, Receipt,
    TokenMetadata, TokenResolver, Wallet,
};
pub use config::AggregatorConfig;
