pub mod tmdb;
pub mod traits;
