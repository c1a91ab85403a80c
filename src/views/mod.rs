pub mod detail;
pub mod footer;
pub mod help;
pub mod search;
pub mod watchlist;
