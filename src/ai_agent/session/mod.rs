pub mod filter;
pub mod runtime;
pub mod state;
