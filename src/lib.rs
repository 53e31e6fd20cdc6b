pub mod arguments;
pub mod catalog;
pub mod config;
pub mod epic;
pub mod errors;
pub mod http;
pub mod locker;
pub mod logger;
pub mod login;
pub mod paths;
pub mod profile;
pub mod telegram;
