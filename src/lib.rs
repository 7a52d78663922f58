pub mod domain;
pub mod infrastructure;
pub mod service;
pub mod utils;

use crate::service::config::JarConfig;
use crate::service::cookie_jar::{CookieJar, InitError};

pub fn initialize(config: JarConfig) -> Result<CookieJar, InitError> {
    CookieJar::new(config)
}

pub fn init_default() -> Result<CookieJar, InitError> {
    let config = JarConfig::default();
    initialize(config)
}
