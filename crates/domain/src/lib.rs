pub mod config;
pub mod error;
pub mod geo;
pub mod stream;
pub mod tool;
