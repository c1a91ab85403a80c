pub mod cycle;
pub mod number;

pub use number::{format_percent, format_price, format_volume, Sign};
