use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, VariantNames};

/// Networks known to the aggregator. The variant set is closed: adding a
/// network means adding a variant here, and the compiler then forces every
/// lookup table below to cover it.
#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, EnumString, VariantNames, Default, Deserialize, Serialize, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockchainName {
    #[default]
    Ethereum,
    BinanceSmartChain,
    Polygon,
    PolygonZkevm,
    Avalanche,
    Moonriver,
    Fantom,
    Arbitrum,
    Aurora,
    Telos,
    Optimism,
    Cronos,
    Gnosis,
    Fuse,
    Moonbeam,
    Celo,
    Boba,
    Kava,
    Metis,
    ZkSync,
    Pulsechain,
    Linea,
    Base,
    Mantle,
    Tron,
    Solana,
    Near,
    Bitcoin,
}

/// Numeric network id. Networks without an EVM-style id (Solana, Near) map
/// to `Unsupported` instead of being absent, so callers must handle them at
/// the match site rather than discovering a missing key at runtime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChainId {
    Id(u64),
    Unsupported,
}

impl ChainId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ChainId::Id(id) => Some(*id),
            ChainId::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ChainId::Id(_))
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainId::Id(id) => write!(f, "{id}"),
            ChainId::Unsupported => write!(f, "UNSUPPORTED"),
        }
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, EnumString, VariantNames, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainType {
    Evm,
    Tron,
    Solana,
    Near,
    Bitcoin,
}

impl BlockchainName {
    /// Total over the enum. Non-EVM networks that expose no numeric id
    /// return `ChainId::Unsupported`.
    pub const fn chain_id(&self) -> ChainId {
        match self {
            BlockchainName::Ethereum => ChainId::Id(1),
            BlockchainName::BinanceSmartChain => ChainId::Id(56),
            BlockchainName::Polygon => ChainId::Id(137),
            BlockchainName::PolygonZkevm => ChainId::Id(1101),
            BlockchainName::Avalanche => ChainId::Id(43114),
            BlockchainName::Moonriver => ChainId::Id(1285),
            BlockchainName::Fantom => ChainId::Id(250),
            BlockchainName::Arbitrum => ChainId::Id(42161),
            BlockchainName::Aurora => ChainId::Id(1313161554),
            BlockchainName::Telos => ChainId::Id(40),
            BlockchainName::Optimism => ChainId::Id(10),
            BlockchainName::Cronos => ChainId::Id(25),
            BlockchainName::Gnosis => ChainId::Id(100),
            BlockchainName::Fuse => ChainId::Id(122),
            BlockchainName::Moonbeam => ChainId::Id(1284),
            BlockchainName::Celo => ChainId::Id(42220),
            BlockchainName::Boba => ChainId::Id(288),
            BlockchainName::Kava => ChainId::Id(2222),
            BlockchainName::Metis => ChainId::Id(1088),
            BlockchainName::ZkSync => ChainId::Id(324),
            BlockchainName::Pulsechain => ChainId::Id(369),
            BlockchainName::Linea => ChainId::Id(59144),
            BlockchainName::Base => ChainId::Id(8453),
            BlockchainName::Mantle => ChainId::Id(5000),
            BlockchainName::Tron => ChainId::Id(195),
            BlockchainName::Bitcoin => ChainId::Id(5555),
            BlockchainName::Solana | BlockchainName::Near => ChainId::Unsupported,
        }
    }

    pub const fn chain_type(&self) -> ChainType {
        match self {
            BlockchainName::Tron => ChainType::Tron,
            BlockchainName::Solana => ChainType::Solana,
            BlockchainName::Near => ChainType::Near,
            BlockchainName::Bitcoin => ChainType::Bitcoin,
            _ => ChainType::Evm,
        }
    }

    pub const fn is_evm(&self) -> bool {
        matches!(self.chain_type(), ChainType::Evm)
    }

    /// Reverse lookup from a numeric chain id, for provider responses that
    /// identify chains by id only.
    pub fn from_chain_id(id: u64) -> Option<BlockchainName> {
        BlockchainName::iter().find(|name| name.chain_id() == ChainId::Id(id))
    }
}
