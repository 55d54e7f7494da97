pub mod auth;
pub mod catalog;
pub mod config;
pub mod notify;
pub mod output;
pub mod records;
pub mod scoring;
pub mod session;
pub mod store;
