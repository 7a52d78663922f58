pub mod idna_backend;
pub mod suffix_backend;
