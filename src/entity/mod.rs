pub mod blacklist;
pub mod watchlist;
