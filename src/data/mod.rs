pub mod catalog;
pub mod details;
pub mod selection;
pub mod types;
pub mod watchlist;

pub use details::{DetailCache, DetailSync};
pub use selection::Selection;
pub use types::*;
pub use watchlist::*;
