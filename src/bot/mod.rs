pub mod commands;
pub mod message;
pub mod state;
pub mod utils;
