pub mod partition_key;
pub mod url_component;
