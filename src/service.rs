pub mod config;
pub mod cookie_jar;
