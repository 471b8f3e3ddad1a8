pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod credentials;
pub mod http_client;
pub mod output;
pub mod tui;
