mod search;
mod terminal;

pub use search::CatalogSearch;
pub use terminal::Terminal;
