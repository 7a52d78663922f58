pub mod cookie_traits;
pub mod host_traits;
pub mod suffix_traits;
