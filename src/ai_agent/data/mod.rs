pub mod cache;
pub mod data;
pub mod models;
