pub mod collaborators;
pub mod mock;

pub use collaborators::{CallDescriptor, ChainReader, Receipt, TokenMetadata, TokenResolver, Wallet};
pub use mock::{MockChainReader, MockTokenResolver, MockWallet};
