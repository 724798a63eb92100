use super::collaborators::{CallDescriptor, ChainReader, Receipt, TokenMetadata, TokenResolver, Wallet};
use crate::chains::BlockchainName;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use eyre::{Result, eyre};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// In-memory wallet: one address across a fixed set of chains, records every
/// submitted call.
pub struct MockWallet {
    address: Address,
    chains: Vec<BlockchainName>,
    sent: Mutex<Vec<(BlockchainName, CallDescriptor)>>,
}

impl MockWallet {
    pub fn new(address: Address, chains: Vec<BlockchainName>) -> MockWallet {
        MockWallet { address, chains, sent: Mutex::new(Vec::new()) }
    }

    pub fn sent_calls(&self) -> Vec<(BlockchainName, CallDescriptor)> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn address(&self, chain: BlockchainName) -> Option<Address> {
        self.chains.contains(&chain).then_some(self.address)
    }

    async fn send_call(&self, chain: BlockchainName, call: CallDescriptor) -> Result<Receipt> {
        let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        sent.push((chain, call));
        Ok(Receipt {
            transaction_hash: B256::repeat_byte(0xab),
            block_number: sent.len() as u64,
            gas_used: 21_000,
        })
    }
}

/// Chain reader with scripted gas answers. Scripted results are consumed one
/// per estimate; once exhausted the fixed answer applies.
pub struct MockChainReader {
    fixed: Option<u64>,
    scripted: Mutex<VecDeque<Option<u64>>>,
}

impl MockChainReader {
    pub fn fixed(gas: u64) -> MockChainReader {
        MockChainReader { fixed: Some(gas), scripted: Mutex::new(VecDeque::new()) }
    }

    pub fn failing() -> MockChainReader {
        MockChainReader { fixed: None, scripted: Mutex::new(VecDeque::new()) }
    }

    pub fn with_sequence(results: Vec<Option<u64>>) -> MockChainReader {
        MockChainReader { fixed: None, scripted: Mutex::new(results.into()) }
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn estimate_gas(&self, _chain: BlockchainName, _from: Address, _call: &CallDescriptor) -> Option<u64> {
        let mut scripted = self.scripted.lock().unwrap_or_else(PoisonError::into_inner);
        match scripted.pop_front() {
            Some(result) => result,
            None => self.fixed,
        }
    }
}

/// Token metadata lookup backed by a plain map.
#[derive(Default)]
pub struct MockTokenResolver {
    metadata: HashMap<(BlockchainName, Address), TokenMetadata>,
}

impl MockTokenResolver {
    pub fn new() -> MockTokenResolver {
        MockTokenResolver::default()
    }

    pub fn with_token(mut self, chain: BlockchainName, address: Address, symbol: &str, decimals: u8) -> Self {
        self.metadata.insert(
            (chain, address),
            TokenMetadata { symbol: Some(symbol.to_string()), name: None, decimals },
        );
        self
    }
}

#[async_trait]
impl TokenResolver for MockTokenResolver {
    async fn resolve(&self, chain: BlockchainName, address: Address) -> Result<TokenMetadata> {
        self.metadata
            .get(&(chain, address))
            .cloned()
            .ok_or_else(|| eyre!("no metadata for {address} on {chain}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256};

    #[tokio::test]
    async fn test_mock_wallet_records_calls() {
        let wallet = MockWallet::new(Address::repeat_byte(0x01), vec![BlockchainName::Ethereum]);
        assert_eq!(wallet.address(BlockchainName::Ethereum), Some(Address::repeat_byte(0x01)));
        assert_eq!(wallet.address(BlockchainName::Polygon), None);

        let call = CallDescriptor { to: Address::repeat_byte(0x02), data: Bytes::new(), value: U256::ZERO };
        let receipt = wallet.send_call(BlockchainName::Ethereum, call.clone()).await.unwrap();
        assert_eq!(receipt.block_number, 1);
        assert_eq!(wallet.sent_calls(), vec![(BlockchainName::Ethereum, call)]);
    }

    #[tokio::test]
    async fn test_mock_chain_reader_sequence_then_fixed() {
        let reader = MockChainReader::with_sequence(vec![Some(100), None]);
        let call = CallDescriptor { to: Address::ZERO, data: Bytes::new(), value: U256::ZERO };
        let from = Address::repeat_byte(0x01);

        assert_eq!(reader.estimate_gas(BlockchainName::Ethereum, from, &call).await, Some(100));
        assert_eq!(reader.estimate_gas(BlockchainName::Ethereum, from, &call).await, None);
        assert_eq!(reader.estimate_gas(BlockchainName::Ethereum, from, &call).await, None);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let reader = MockChainReader::with_sequence(vec![Some(1), None, Some(3)]);
        let call = CallDescriptor { to: Address::ZERO, data: Bytes::new(), value: U256::ZERO };
        let calls = vec![call.clone(), call.clone(), call];

        let estimates = reader.estimate_gas_batch(BlockchainName::Ethereum, Address::ZERO, &calls).await;
        assert_eq!(estimates, vec![Some(1), None, Some(3)]);
    }
}
