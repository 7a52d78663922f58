pub mod cookie;
pub mod host;
pub mod http;
