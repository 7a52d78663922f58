pub mod reqwest_adapter;
