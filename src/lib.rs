pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod pgpass;
pub mod pipeline;
pub mod process;
pub mod storage;
pub mod utils;
