use crate::chains::BlockchainName;
use crate::execution::{CallDescriptor, ChainReader};
use alloy_primitives::Address;

/// Fallback gas limits keyed by swap-hop count. Routes longer than the table
/// reuse the last entry.
const DEFAULT_GAS_BY_HOPS: [u64; 4] = [263_000, 354_000, 465_000, 576_000];

/// Extra gas when the output must be unwrapped to the native asset.
const NATIVE_UNWRAP_GAS: u64 = 36_000;

pub fn default_gas_limit(hops: usize, unwraps_native: bool) -> u64 {
    let index = hops.saturating_sub(1).min(DEFAULT_GAS_BY_HOPS.len() - 1);
    let base = DEFAULT_GAS_BY_HOPS[index];
    if unwraps_native { base + NATIVE_UNWRAP_GAS } else { base }
}

/// Gas limits for a batch of candidate calls: starts from the supplied
/// defaults, then layers live estimates on top index for index. A failed
/// estimate keeps its default; the order of results never changes.
pub async fn estimate_gas_limits(
    reader: &dyn ChainReader,
    chain: BlockchainName,
    sender: Address,
    calls: &[CallDescriptor],
    defaults: &[u64],
) -> Vec<u64> {
    let mut limits = defaults.to_vec();
    let estimates = reader.estimate_gas_batch(chain, sender, calls).await;
    for (index, estimate) in estimates.into_iter().enumerate() {
        if let (Some(gas), Some(slot)) = (estimate, limits.get_mut(index)) {
            *slot = gas;
        }
    }
    limits
}
