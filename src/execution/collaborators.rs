use crate::chains::BlockchainName;
use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};

/// A transaction ready to sign: target, calldata and attached native value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
}

/// Signing and submission seam. The engine never holds keys; it hands a
/// `CallDescriptor` to whatever the host application wires in here.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The wallet's address on `chain`, `None` when it is not connected there.
    fn address(&self, chain: BlockchainName) -> Option<Address>;

    async fn send_call(&self, chain: BlockchainName, call: CallDescriptor) -> Result<Receipt>;
}

/// Read-only chain access.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Gas estimate for `call` sent by `from`. `None` when estimation fails
    /// for any reason; estimation never errors out of this trait.
    async fn estimate_gas(&self, chain: BlockchainName, from: Address, call: &CallDescriptor) -> Option<u64>;

    /// One result per call, index for index, in the order given.
    async fn estimate_gas_batch(
        &self,
        chain: BlockchainName,
        from: Address,
        calls: &[CallDescriptor],
    ) -> Vec<Option<u64>> {
        let mut estimates = Vec::with_capacity(calls.len());
        for call in calls {
            estimates.push(self.estimate_gas(chain, from, call).await);
        }
        estimates
    }
}

/// On-chain token metadata lookup. Resolved decimals are authoritative over
/// anything the caller supplied.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve(&self, chain: BlockchainName, address: Address) -> Result<TokenMetadata>;
}
