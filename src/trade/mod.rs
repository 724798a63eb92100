mod call_builder;
mod gas;
mod route;
#[allow(clippy::module_inception)]
mod trade;

pub use call_builder::finish_swap_call;
pub use gas::{default_gas_limit, estimate_gas_limits};
pub use route::{RouteHash, generate_route_hash};
pub use trade::Trade;
pub(crate) use trade::epoch_now;
