pub mod registry;
pub mod wrapped;

pub use registry::{BlockchainName, ChainId, ChainType};
pub use wrapped::{NATIVE, WrappedNative, WrappedNativeAddress, wrapped_native};
