pub mod config;
pub mod error;
pub mod hero;
pub mod links;
pub mod models;
pub mod navigation;
pub mod playback;
pub mod storage;
