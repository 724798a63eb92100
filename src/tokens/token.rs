use crate::chains::{BlockchainName, ChainId, NATIVE, wrapped_native};
use alloy_primitives::utils::Unit;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A token pinned to one network. Identity is (blockchain, address); the
/// address compares as raw bytes, so hex casing never matters. Symbol, name
/// and decimals are metadata and take no part in equality.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Token {
    blockchain: BlockchainName,
    address: Address,
    decimals: u8,
    name: Option<String>,
    symbol: Option<String>,
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blockchain.hash(state);
        self.address.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.blockchain == other.blockchain && self.address == other.address
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(blockchain: BlockchainName, address: Address) -> Token {
        Token { blockchain, address, decimals: 18, ..Token::default() }
    }

    pub fn new_with_data(
        blockchain: BlockchainName,
        address: Address,
        symbol: Option<String>,
        name: Option<String>,
        decimals: Option<u8>,
    ) -> Token {
        Token { blockchain, address, symbol, name, decimals: decimals.unwrap_or(18) }
    }

    /// The chain's native asset, modeled as the zero address.
    pub fn native(blockchain: BlockchainName) -> Token {
        Token { blockchain, address: NATIVE, decimals: 18, ..Token::default() }
    }

    /// The chain's canonical wrapped-native token, if the chain has one.
    pub fn wrapped(blockchain: BlockchainName) -> Option<Token> {
        wrapped_native(blockchain)
            .map(|w| Token::new_with_data(blockchain, w.address, Some(w.symbol.to_string()), None, Some(18)))
    }

    // For testing purposes
    pub fn random(blockchain: BlockchainName) -> Token {
        Token::new(blockchain, Address::random())
    }

    // For testing purposes
    pub fn repeat_byte(blockchain: BlockchainName, byte: u8) -> Token {
        Token::new(blockchain, Address::repeat_byte(byte))
    }

    pub fn get_blockchain(&self) -> BlockchainName {
        self.blockchain
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    pub fn get_decimals(&self) -> u8 {
        self.decimals
    }

    pub fn get_symbol(&self) -> String {
        self.symbol.clone().unwrap_or(self.address.to_string())
    }

    pub fn get_name(&self) -> String {
        self.name.clone().unwrap_or(self.address.to_string())
    }

    pub fn chain_id(&self) -> ChainId {
        self.blockchain.chain_id()
    }

    pub fn get_exp(&self) -> U256 {
        if self.decimals == 18 { Unit::ETHER.wei() } else { U256::from(10).pow(U256::from(self.decimals)) }
    }

    pub fn is_native(&self) -> bool {
        self.address.is_zero()
    }

    pub fn is_wrapped_native(&self) -> bool {
        wrapped_native(self.blockchain).is_some_and(|w| w.address == self.address)
    }

    /// Display-only conversion. On-chain amounts stay in `U256`, see
    /// `TokenAmount` for the exact path.
    pub fn to_float(&self, value: U256) -> f64 {
        if self.decimals == 0 {
            0f64
        } else {
            let divider = self.get_exp();
            let ret = value.div_rem(divider);

            let div = u64::try_from(ret.0);
            let rem = u64::try_from(ret.1);

            if div.is_err() || rem.is_err() {
                0f64
            } else {
                div.unwrap_or_default() as f64 + ((rem.unwrap_or_default() as f64) / (10u64.pow(self.decimals as u32) as f64))
            }
        }
    }
}
