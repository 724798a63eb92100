use super::registry::BlockchainName;
use alloy_primitives::{Address, address};

/// Sentinel address for a chain's native asset.
pub const NATIVE: Address = Address::ZERO;

#[non_exhaustive]
pub struct WrappedNativeAddress;

impl WrappedNativeAddress {
    pub const ETHEREUM: Address = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    pub const BINANCE_SMART_CHAIN: Address = address!("0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c");
    pub const POLYGON: Address = address!("0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270");
    pub const POLYGON_ZKEVM: Address = address!("0x4f9a0e7fd2bf6067db6994cf12e4495df938e6e9");
    pub const AVALANCHE: Address = address!("0xb31f66aa3c1e785363f0875a1b74e27b85fd66c7");
    pub const MOONRIVER: Address = address!("0xf50225a84382c74cbdea10b0c176f71fc3de0c4d");
    pub const FANTOM: Address = address!("0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83");
    pub const ARBITRUM: Address = address!("0x82af49447d8a07e3bd95bd0d56f35241523fbab1");
    pub const AURORA: Address = address!("0xc9bdeed33cd01541e1eed10f90519d2c06fe3feb");
    pub const TELOS: Address = address!("0xd102ce6a4db07d247fcc28f366a623df0938ca9e");
    pub const OPTIMISM: Address = address!("0x4200000000000000000000000000000000000006");
    pub const CRONOS: Address = address!("0x5c7f8a570d578ed84e63fdfa7b1ee72deae1ae23");
    pub const GNOSIS: Address = address!("0xe91d153e0b41518a2ce8dd3d7944fa863463a97d");
    pub const FUSE: Address = address!("0x0be9e53fd7edac9f859882afdda116645287c629");
    pub const MOONBEAM: Address = address!("0xacc15dc74880c9944775448304b263d191c6077f");
    pub const CELO: Address = address!("0x122013fd7df1c6f636a5bb8f03108e876548b455");
    pub const BOBA: Address = address!("0xdeaddeaddeaddeaddeaddeaddeaddeaddead0000");
    pub const KAVA: Address = address!("0xc86c7c0efbd6a49b35e8714c5f59d99de09a225b");
    pub const METIS: Address = address!("0xdeaddeaddeaddeaddeaddeaddeaddeaddead0000");
    pub const ZK_SYNC: Address = address!("0x5aea5775959fbc2557cc8789bc1bf90a239d9a91");
    pub const PULSECHAIN: Address = address!("0xa1077a294dde1b09bb078844df40758a5d0f9a27");
    pub const LINEA: Address = address!("0xe5d7c2a44ffddf6b295a15c148167daaaf5cf34f");
    pub const BASE: Address = address!("0x4200000000000000000000000000000000000006");
    pub const MANTLE: Address = address!("0x78c1b0c915c4faa5fffa6cabf0219da63d7f4cb8");
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WrappedNative {
    pub address: Address,
    pub symbol: &'static str,
}

/// Wrapped-native token for an EVM chain. Non-EVM chains have none.
pub const fn wrapped_native(chain: BlockchainName) -> Option<WrappedNative> {
    let (address, symbol) = match chain {
        BlockchainName::Ethereum => (WrappedNativeAddress::ETHEREUM, "WETH"),
        BlockchainName::BinanceSmartChain => (WrappedNativeAddress::BINANCE_SMART_CHAIN, "WBNB"),
        BlockchainName::Polygon => (WrappedNativeAddress::POLYGON, "WMATIC"),
        BlockchainName::PolygonZkevm => (WrappedNativeAddress::POLYGON_ZKEVM, "WETH"),
        BlockchainName::Avalanche => (WrappedNativeAddress::AVALANCHE, "WAVAX"),
        BlockchainName::Moonriver => (WrappedNativeAddress::MOONRIVER, "WMOVR"),
        BlockchainName::Fantom => (WrappedNativeAddress::FANTOM, "WFTM"),
        BlockchainName::Arbitrum => (WrappedNativeAddress::ARBITRUM, "WETH"),
        BlockchainName::Aurora => (WrappedNativeAddress::AURORA, "WETH"),
        BlockchainName::Telos => (WrappedNativeAddress::TELOS, "WTLOS"),
        BlockchainName::Optimism => (WrappedNativeAddress::OPTIMISM, "WETH"),
        BlockchainName::Cronos => (WrappedNativeAddress::CRONOS, "WCRO"),
        BlockchainName::Gnosis => (WrappedNativeAddress::GNOSIS, "WXDAI"),
        BlockchainName::Fuse => (WrappedNativeAddress::FUSE, "WFUSE"),
        BlockchainName::Moonbeam => (WrappedNativeAddress::MOONBEAM, "WGLMR"),
        BlockchainName::Celo => (WrappedNativeAddress::CELO, "WETH"),
        BlockchainName::Boba => (WrappedNativeAddress::BOBA, "WETH"),
        BlockchainName::Kava => (WrappedNativeAddress::KAVA, "WKAVA"),
        BlockchainName::Metis => (WrappedNativeAddress::METIS, "WMETIS"),
        BlockchainName::ZkSync => (WrappedNativeAddress::ZK_SYNC, "WETH"),
        BlockchainName::Pulsechain => (WrappedNativeAddress::PULSECHAIN, "WPLS"),
        BlockchainName::Linea => (WrappedNativeAddress::LINEA, "WETH"),
        BlockchainName::Base => (WrappedNativeAddress::BASE, "WETH"),
        BlockchainName::Mantle => (WrappedNativeAddress::MANTLE, "WMNT"),
        BlockchainName::Tron | BlockchainName::Solana | BlockchainName::Near | BlockchainName::Bitcoin => return None,
    };
    Some(WrappedNative { address, symbol })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_native_is_zero() {
        assert!(NATIVE.is_zero());
    }

    #[test]
    fn test_wrapped_native_lookup() {
        let weth = wrapped_native(BlockchainName::Ethereum).unwrap();
        assert_eq!(weth.address, WrappedNativeAddress::ETHEREUM);
        assert_eq!(weth.symbol, "WETH");

        let wmatic = wrapped_native(BlockchainName::Polygon).unwrap();
        assert_eq!(wmatic.symbol, "WMATIC");

        assert!(wrapped_native(BlockchainName::Bitcoin).is_none());
        assert!(wrapped_native(BlockchainName::Solana).is_none());
    }

    #[test]
    fn test_every_evm_chain_has_wrapped_native() {
        for chain in BlockchainName::iter().filter(BlockchainName::is_evm) {
            assert!(wrapped_native(chain).is_some(), "{chain} is missing a wrapped native token");
        }
    }
}
