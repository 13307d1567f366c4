pub mod config;
pub mod logging;

pub mod checksum;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod storage;
