use crate::providers::RouteHop;
use alloy_primitives::hex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display};

/// Stable fingerprint of a route, usable as a cache or dedup key.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct RouteHash(pub [u8; 32]);

impl Display for RouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_prefixed(self.0))
    }
}

impl Debug for RouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RouteHash({})", hex::encode_prefixed(self.0))
    }
}

impl From<[u8; 32]> for RouteHash {
    fn from(hash: [u8; 32]) -> Self {
        RouteHash(hash)
    }
}

impl Serialize for RouteHash {
    fn serialize<S>(&self, serializer: S) -> eyre::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode_prefixed(self.0))
    }
}

impl<'de> Deserialize<'de> for RouteHash {
    fn deserialize<D>(deserializer: D) -> eyre::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("route hash must be 32 bytes"));
        }
        let mut hash = [0; 32];
        hash.copy_from_slice(&bytes);
        Ok(RouteHash(hash))
    }
}

/// Hashes the chain and address of every hop token, in order. Venue labels
/// and metadata stay out so the same path always fingerprints the same.
pub fn generate_route_hash(route: &[RouteHop]) -> RouteHash {
    let mut hasher = Sha256::new();
    for hop in route {
        hasher.update(hop.token.get_blockchain().to_string().as_bytes());
        hasher.update(hop.token.get_address().as_slice());
    }
    RouteHash(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::BlockchainName;
    use crate::tokens::Token;

    fn hop(chain: BlockchainName, byte: u8, via: &str) -> RouteHop {
        RouteHop::new(Token::repeat_byte(chain, byte), via)
    }

    #[test]
    fn test_serialize_route_hash() {
        let route_hash = RouteHash([1; 32]);

        let serialized = serde_json::to_string(&route_hash).unwrap();
        let deserialized: RouteHash = serde_json::from_str(&serialized).unwrap();

        assert_eq!(route_hash, deserialized);
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        assert!(serde_json::from_str::<RouteHash>("\"0x0102\"").is_err());
    }

    #[test]
    fn test_hash_ignores_via_labels() {
        let a = vec![hop(BlockchainName::Ethereum, 1, "SYMBIOSIS"), hop(BlockchainName::Polygon, 2, "SYMBIOSIS")];
        let b = vec![hop(BlockchainName::Ethereum, 1, "LI_FI"), hop(BlockchainName::Polygon, 2, "hop")];
        assert_eq!(generate_route_hash(&a), generate_route_hash(&b));
    }

    #[test]
    fn test_hash_is_order_and_chain_sensitive() {
        let forward = vec![hop(BlockchainName::Ethereum, 1, "x"), hop(BlockchainName::Polygon, 2, "x")];
        let backward = vec![hop(BlockchainName::Polygon, 2, "x"), hop(BlockchainName::Ethereum, 1, "x")];
        assert_ne!(generate_route_hash(&forward), generate_route_hash(&backward));

        let same_addresses_other_chain =
            vec![hop(BlockchainName::Ethereum, 1, "x"), hop(BlockchainName::Arbitrum, 2, "x")];
        assert_ne!(generate_route_hash(&forward), generate_route_hash(&same_addresses_other_chain));
    }
}
