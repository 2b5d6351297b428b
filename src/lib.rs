pub mod action;
pub mod config;
pub mod error;
pub mod logger;
pub mod posts;
pub mod server;
pub mod storage;
