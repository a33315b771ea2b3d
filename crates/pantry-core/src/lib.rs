pub mod auth;
pub mod client;
pub mod config;
pub mod import;
pub mod models;
pub mod persistence;
pub mod poller;
pub mod resources;
pub mod sqlite;
pub mod store;
pub mod toast;
pub mod transport;
