//! Core translation engine module

pub mod client;
pub mod config;
pub mod driver;
pub mod errors;
pub mod io;
pub mod models;
pub mod provider;
pub mod worker;
