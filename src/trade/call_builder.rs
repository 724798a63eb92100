use crate::execution::CallDescriptor;
use crate::providers::SwapCall;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, sol};

sol! {
    /// Router entry points for finishing a swap whose output arrives as
    /// wrapped native.
    interface SwapRouter {
        function multicall(bytes[] calldata data) external payable returns (bytes[] memory results);
        function unwrapWNativeToken(uint256 amountMinimum, address recipient) external payable;
    }
}

/// Finishes a provider call. When the output lands as wrapped native, the
/// swap and the unwrap to the receiver become ONE multicall on the
/// provider's router; the wallet always signs a single descriptor.
pub fn finish_swap_call(swap: SwapCall, min_output_wei: U256, receiver: Address) -> CallDescriptor {
    if !swap.needs_native_unwrap {
        return swap.call;
    }

    let unwrap = SwapRouter::unwrapWNativeTokenCall { amountMinimum: min_output_wei, recipient: receiver };
    let bundle = SwapRouter::multicallCall { data: vec![swap.call.data, unwrap.abi_encode().into()] };

    CallDescriptor { to: swap.call.to, data: bundle.abi_encode().into(), value: swap.call.value }
}
