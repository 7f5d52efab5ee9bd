pub mod config;
pub mod database;
pub mod errors;
pub mod events;
pub mod las;
pub mod services;
pub mod storage;
