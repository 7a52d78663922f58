pub mod entry_builder;
pub mod matching;
