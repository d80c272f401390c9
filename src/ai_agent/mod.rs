pub mod agents;
pub mod data;
pub mod error;
pub mod llm;
pub mod session;
pub mod tools;
pub mod utils;
