pub mod api;
pub mod config;
pub mod diff;
pub mod errors;
pub mod llm;
pub mod prompts;
pub mod review;
pub mod server;
