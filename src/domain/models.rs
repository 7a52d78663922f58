pub mod cookie_models;
