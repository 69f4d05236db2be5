pub mod client;
pub mod error;
pub mod types;

pub use client::{TmdbClient, TrendingWindow};
pub use error::TmdbError;
