pub mod config;
pub mod errors;
pub mod mapping;
pub mod models;
pub mod normalize;
