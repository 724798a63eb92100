pub mod manager;
pub mod request;
pub mod results;

pub use manager::{CalculationManager, CalculationManagerBuilder};
pub use request::{DEFAULT_DEADLINE_MINUTES, DEFAULT_SLIPPAGE, SwapOptions, SwapRequest};
pub use results::{CalculationResult, Calculations};
