pub mod adb;
pub mod cli;
pub mod config;
pub mod connection;
pub mod devices;
pub mod error;
pub mod logging;
pub mod models;
pub mod packages;
pub mod state;
pub mod store;
pub mod web;

#[cfg(test)]
mod testing;
