pub mod amount;
pub mod token;

pub use amount::{PPM, TokenAmount, apply_ppm};
pub use token::Token;
